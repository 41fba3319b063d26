// Status bar widget: roster counts, coach on the clock, turn countdown.

use std::time::Duration;

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Seconds left at which the countdown turns red.
const LOW_TIME: Duration = Duration::from_secs(10);

/// Render the status bar into the given area.
///
/// Layout: [counts] | [on the clock] | [countdown]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let counts = state.snapshot.counts;
    let separator = || Span::styled(" | ", Style::default().fg(Color::Gray));

    let mut spans = vec![
        Span::styled(
            " draftboard ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format!(
                "Players {} | Open {} | Assigned {} | Coaches {}",
                counts.total, counts.open, counts.assigned, counts.coaches
            ),
            Style::default().fg(Color::White),
        ),
        separator(),
    ];

    match state.snapshot.current_coach() {
        Some(coach) => {
            spans.push(Span::raw("On the clock: "));
            spans.push(Span::styled(
                coach.name.clone(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        None => spans.push(Span::styled(
            "No coach on the clock",
            Style::default().fg(Color::DarkGray),
        )),
    }

    if let Some(remaining) = state.timer_remaining {
        spans.push(separator());
        let color = if remaining <= LOW_TIME {
            Color::Red
        } else {
            Color::Yellow
        };
        spans.push(Span::styled(
            format_countdown(remaining),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Format time left as `m:ss`.
pub fn format_countdown(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::snapshot_with;

    #[test]
    fn format_countdown_basic() {
        assert_eq!(format_countdown(Duration::from_secs(60)), "1:00");
        assert_eq!(format_countdown(Duration::from_secs(59)), "0:59");
        assert_eq!(format_countdown(Duration::from_secs(5)), "0:05");
        assert_eq!(format_countdown(Duration::ZERO), "0:00");
    }

    #[test]
    fn render_shows_coach_and_countdown() {
        let backend = ratatui::backend::TestBackend::new(120, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.snapshot = snapshot_with("Ava, Ben", "Ann");
        state.timer_remaining = Some(Duration::from_secs(42));
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();

        let line: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(line.contains("Players 2"), "{line}");
        assert!(line.contains("On the clock: Ann"), "{line}");
        assert!(line.contains("0:42"), "{line}");
    }

    #[test]
    fn render_does_not_panic_empty() {
        let backend = ratatui::backend::TestBackend::new(40, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
