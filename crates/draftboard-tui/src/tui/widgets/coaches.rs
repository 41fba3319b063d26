// Coaches widget: one card per coach with their picks, in rotation order.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use draftboard_core::draft::CoachRow;

use crate::tui::{Focus, ViewState};

/// Render the coach cards into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let focused = state.focus == Focus::Coaches;

    let items: Vec<ListItem> = if state.snapshot.coaches.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "  No coaches yet (press c to add)",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        state.snapshot.coaches.iter().map(coach_card).collect()
    };

    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(format!(" Coaches ({}) ", state.snapshot.coaches.len())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut list_state = ListState::default();
    if focused && !state.snapshot.coaches.is_empty() {
        list_state.select(Some(state.selected_coach));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Header line with the pick count, then the picks themselves.
fn coach_card(coach: &CoachRow) -> ListItem<'static> {
    let (marker, name_style) = if coach.on_the_clock {
        (
            "▶ ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("  ", Style::default().fg(Color::White))
    };

    let header = Line::from(vec![
        Span::styled(marker, name_style),
        Span::styled(coach.name.clone(), name_style),
        Span::styled(
            format!(" ({} picks)", coach.pick_count()),
            Style::default().fg(Color::Gray),
        ),
    ]);

    ListItem::new(vec![header, Line::from(format!("    {}", format_picks(&coach.picks)))])
}

/// Comma-separated picks, or a dash when there are none.
pub fn format_picks(picks: &[String]) -> String {
    if picks.is_empty() {
        "-".to_string()
    } else {
        picks.join(", ")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::snapshot_with;

    #[test]
    fn format_picks_basic() {
        assert_eq!(format_picks(&[]), "-");
        assert_eq!(
            format_picks(&["Ava".to_string(), "Ben".to_string()]),
            "Ava, Ben"
        );
    }

    #[test]
    fn render_does_not_panic_empty() {
        let backend = ratatui::backend::TestBackend::new(40, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_marks_coach_on_the_clock() {
        let backend = ratatui::backend::TestBackend::new(40, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.snapshot = snapshot_with("Ava", "Ann, Bo");
        state.focus = Focus::Coaches;
        state.selected_coach = 1;
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Ann (0 picks)"), "{text}");
        assert!(text.contains("Bo (0 picks)"));
        assert_eq!(text.matches('▶').count(), 1);
    }
}
