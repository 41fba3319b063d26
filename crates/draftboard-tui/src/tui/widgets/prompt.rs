// Prompt widget: the text entry box while typing names, otherwise the
// current notice.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the prompt box into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = match &state.input {
        Some(input) => {
            // Keep the tail of long input visible.
            let inner_width = area.width.saturating_sub(3) as usize;
            let shown = tail(&display_buffer(&input.buffer), inner_width);
            Paragraph::new(Line::from(vec![
                Span::raw(shown),
                Span::styled("█", Style::default().fg(Color::White)),
            ]))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(input.title()),
            )
        }
        None => {
            let line = match &state.notice {
                Some(message) => Line::from(Span::styled(
                    message.clone(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
                None => Line::from(""),
            };
            Paragraph::new(line).block(Block::default().borders(Borders::ALL))
        }
    };

    frame.render_widget(paragraph, area);
}

/// Tabs shown as a visible separator.
fn display_buffer(buffer: &str) -> String {
    buffer.replace('\t', " ⇥ ")
}

/// The last `width` characters of `text`.
fn tail(text: &str, width: usize) -> String {
    let len = text.chars().count();
    text.chars().skip(len.saturating_sub(width)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::{InputTarget, TextInput};

    fn render_text(state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(40, 3);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn tail_keeps_end() {
        assert_eq!(tail("abcdef", 3), "def");
        assert_eq!(tail("ab", 5), "ab");
        assert_eq!(tail("", 5), "");
    }

    #[test]
    fn shows_notice() {
        let mut state = ViewState::default();
        state.notice = Some("Add at least one coach first.".into());
        assert!(render_text(&state).contains("Add at least one coach"));
    }

    #[test]
    fn shows_input_buffer() {
        let mut state = ViewState::default();
        state.notice = Some("hidden while typing".into());
        state.input = Some(TextInput {
            target: InputTarget::Coaches,
            buffer: "Ann, Bo".into(),
        });
        let text = render_text(&state);
        assert!(text.contains("Ann, Bo"));
        assert!(!text.contains("hidden"));
    }
}
