// Confirmation overlay widget.
//
// Centered modal asking the user to confirm a destructive action. Drawn on
// top of the board while `ViewState::confirm` is set.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::PendingConfirm;

const MIN_DIALOG_WIDTH: u16 = 28;
const DIALOG_HEIGHT: u16 = 5;

/// Render the confirmation overlay centered in `area`.
pub fn render(frame: &mut Frame, area: Rect, pending: &PendingConfirm) {
    let question = pending.question();
    let width = dialog_width(&question);
    let dialog_area = centered_rect(width, DIALOG_HEIGHT, area);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            " Confirm ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

    let text = vec![
        Line::from(format!("  {question}")),
        Line::from(vec![
            Span::raw("  ("),
            Span::styled("y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw("/"),
            Span::styled("n", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(")"),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().bg(Color::Black));

    frame.render_widget(paragraph, dialog_area);
}

/// Wide enough for the question plus padding and borders.
fn dialog_width(question: &str) -> u16 {
    let needed = question.chars().count() as u16 + 6;
    needed.max(MIN_DIALOG_WIDTH)
}

/// Compute a centered rectangle of the given size within `area`, clamped to
/// the space available.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .split(area);

    let horizontal = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .split(vertical[0]);

    horizontal[0]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_centered() {
        let area = Rect::new(0, 0, 80, 24);
        let result = centered_rect(30, DIALOG_HEIGHT, area);
        assert_eq!(result.width, 30);
        assert_eq!(result.height, DIALOG_HEIGHT);
        let dx = (result.x + result.width / 2) as i32 - 40;
        let dy = (result.y + result.height / 2) as i32 - 12;
        assert!(dx.abs() <= 1, "off center by {dx}");
        assert!(dy.abs() <= 1, "off center by {dy}");
    }

    #[test]
    fn centered_rect_clamps_to_small_area() {
        let area = Rect::new(0, 0, 10, 3);
        let result = centered_rect(40, DIALOG_HEIGHT, area);
        assert!(result.width <= area.width);
        assert!(result.height <= area.height);
    }

    #[test]
    fn long_names_widen_the_dialog() {
        assert_eq!(dialog_width("Really quit?"), MIN_DIALOG_WIDTH);
        let long = "Remove Coach With An Unusually Long Name?";
        assert_eq!(dialog_width(long), long.len() as u16 + 6);
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &PendingConfirm::ClearCoaches))
            .unwrap();
    }
}
