// Roster entries and their display status.

use serde::{Deserialize, Serialize};

use super::coach::CoachId;

/// One player on the roster.
///
/// `available` is the user's eligibility flag and is independent of whether
/// the player has been assigned to a coach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub available: bool,
    pub assigned_to: Option<CoachId>,
}

impl Player {
    pub(crate) fn new(name: String) -> Self {
        Player {
            name,
            available: false,
            assigned_to: None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_to.is_some()
    }

    /// Available and not yet picked by anyone.
    pub fn is_open(&self) -> bool {
        self.available && self.assigned_to.is_none()
    }
}

/// Computed per-player status shown by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlayerStatus {
    Available,
    Unavailable,
    PickedBy { coach: String },
}

impl PlayerStatus {
    pub fn label(&self) -> String {
        match self {
            PlayerStatus::Available => "Available".to_string(),
            PlayerStatus::Unavailable => "Unavailable".to_string(),
            PlayerStatus::PickedBy { coach } => format!("Picked by {coach}"),
        }
    }
}
