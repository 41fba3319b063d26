// Players widget: the roster with availability and who picked each player.
//
// Honors the available-only filter from ViewState and highlights the cursor
// row when the player list has focus.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use ratatui::Frame;

use draftboard_core::draft::{PlayerRow, PlayerStatus};

use crate::tui::{Focus, ViewState};

/// Render the player table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let visible = state.visible_players();
    let focused = state.focus == Focus::Players;

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Name"),
        Cell::from("Avail"),
        Cell::from("Status"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = visible
        .iter()
        .map(|(index, player)| {
            Row::new(vec![
                Cell::from(format!("{}", index + 1)),
                Cell::from(player.name.clone()),
                Cell::from(if player.available { "yes" } else { "no" }),
                Cell::from(player.status.label()),
            ])
            .style(Style::default().fg(status_color(player)))
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(12),
        Constraint::Length(6),
        Constraint::Min(12),
    ];

    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(build_title(state, visible.len())),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");

    let mut table_state = TableState::default();
    if focused && !visible.is_empty() {
        table_state.select(Some(state.selected_player));
    }
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// Panel title with the number of players shown.
pub fn build_title(state: &ViewState, shown: usize) -> String {
    if state.available_only {
        format!(" Players ({} of {}, available only) ", shown, state.snapshot.players.len())
    } else {
        format!(" Players ({}) ", shown)
    }
}

fn status_color(player: &PlayerRow) -> Color {
    match player.status {
        PlayerStatus::Available => Color::Green,
        PlayerStatus::Unavailable => Color::DarkGray,
        PlayerStatus::PickedBy { .. } => Color::Blue,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
