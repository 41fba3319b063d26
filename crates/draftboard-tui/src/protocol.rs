// Messages exchanged between the app event loop and the TUI.

use std::time::Duration;

use draftboard_core::draft::{CoachId, DraftSnapshot};
use draftboard_core::snake::PickSlot;

/// Commands sent from the TUI to the app event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Replace the roster with names parsed from raw text.
    LoadPlayers(String),
    /// Add coaches parsed from raw text. Blank text adds one coach with a
    /// default name.
    AddCoaches(String),
    RemoveCoach(CoachId),
    ClearPlayers,
    ClearCoaches,
    SetAvailability { player_index: usize, available: bool },
    MarkAll { available: bool },
    /// Put a coach on the clock.
    SelectCoach(usize),
    NextCoach,
    /// Assign the player to the coach on the clock, or unassign them if that
    /// coach already has them.
    ToggleAssign(usize),
    Unassign { coach: CoachId, player: String },
    AutoAssign,
    PreviewOrder,
    ExportAvailable,
    ExportBoard,
    Quit,
}

/// Updates pushed from the app event loop to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// Full board after a change.
    Snapshot(Box<DraftSnapshot>),
    /// Time left on the clock, or `None` when no countdown is running.
    Timer(Option<Duration>),
    /// The message to show, or `None` to clear it.
    Notice(Option<String>),
    /// Snake draft preview.
    DraftOrder(Vec<PickSlot>),
}
