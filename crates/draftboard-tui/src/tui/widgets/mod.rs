// TUI widget modules for each board panel.

pub mod coaches;
pub mod confirm;
pub mod draft_order;
pub mod players;
pub mod prompt;
pub mod status_bar;
