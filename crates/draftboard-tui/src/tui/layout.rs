// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Prompt: notice or text entry (3 rows)             |
// +-------------------------+------------------------+
// | Players / Order (55%)    | Coaches (45%)          |
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each board zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: roster counts, coach on the clock, countdown.
    pub status_bar: Rect,
    /// Notice line, or the text entry box while typing names.
    pub prompt: Rect,
    /// Left panel: player list, or the snake order preview.
    pub players: Rect,
    /// Right panel: coach cards with their picks.
    pub coaches: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the board layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(3), // prompt
            Constraint::Min(6),    // players + coaches
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(vertical[2]);

    AppLayout {
        status_bar: vertical[0],
        prompt: vertical[1],
        players: horizontal[0],
        coaches: horizontal[1],
        help_bar: vertical[3],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
