pub mod coach;
pub mod engine;
pub mod player;
pub mod state;

pub use coach::{Coach, CoachId};
pub use engine::{DraftChange, DraftEngine, SubscriptionId};
pub use player::{Player, PlayerStatus};
pub use state::{CoachRow, DraftCounts, DraftError, DraftSnapshot, DraftState, PlayerRow, Toggle};
