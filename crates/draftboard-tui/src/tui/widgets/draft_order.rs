// Draft order widget: the snake order preview, one pick per row.

use ratatui::layout::{Constraint, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{
    Block, Borders, Cell, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, Table,
};
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the snake order table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let header = Row::new(vec![
        Cell::from("Pick"),
        Cell::from("Rd"),
        Cell::from("Coach"),
        Cell::from("Player"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    // Borders and header take three rows.
    let visible_rows = area.height.saturating_sub(3) as usize;
    let total = state.draft_order.len();
    let offset = state.order_scroll.min(total.saturating_sub(visible_rows.max(1)));

    let rows: Vec<Row> = state
        .draft_order
        .iter()
        .skip(offset)
        .take(visible_rows.max(1))
        .map(|slot| {
            // Alternate shading by round so the snake turns are easy to spot
            let style = if slot.round % 2 == 0 {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format!("{}", slot.pick_number)),
                Cell::from(format!("{}", slot.round)),
                Cell::from(slot.coach.clone()),
                Cell::from(slot.player.clone()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Length(4),
        Constraint::Min(10),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" Draft Order ({} picks) ", total)),
    );
    frame.render_widget(table, area);

    if total > visible_rows {
        let mut scrollbar_state =
            ScrollbarState::new(total.saturating_sub(visible_rows)).position(offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use draftboard_core::snake::snake_order;

    fn render_text(state: &ViewState, width: u16, height: u16) -> String {
        let backend = ratatui::backend::TestBackend::new(width, height);
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
    fn render_does_not_panic_empty() {
        render_text(&ViewState::default(), 40, 6);
    }

    #[test]
    fn render_shows_picks() {
        let mut state = ViewState::default();
        state.draft_order = snake_order(&["P1", "P2", "P3", "P4"], &["Ann", "Bo"]).unwrap();
        let text = render_text(&state, 50, 10);
        assert!(text.contains("Draft Order (4 picks)"));
        assert!(text.contains("P4"));
    }

    #[test]
    fn scroll_offset_skips_early_picks() {
        let players: Vec<String> = (1..=30).map(|i| format!("Player{i:02}")).collect();
        let mut state = ViewState::default();
        state.draft_order = snake_order(&players, &["Ann", "Bo"]).unwrap();
        state.order_scroll = 10;

        let text = render_text(&state, 50, 10);
        assert!(!text.contains("Player01"));
        assert!(text.contains("Player11"));
    }
}
