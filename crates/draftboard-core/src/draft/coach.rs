// Coaches: the drafters who receive picks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque coach identifier. Cross-references always go through the id,
/// never the display name, since names may collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CoachId(u64);

impl CoachId {
    pub(crate) fn new(raw: u64) -> Self {
        CoachId(raw)
    }

    /// The raw numeric value, for display and logging.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CoachId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "coach#{}", self.0)
    }
}

/// A coach and the players they have picked, in pick order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coach {
    pub id: CoachId,
    pub name: String,
    pub picks: Vec<String>,
}

impl Coach {
    pub(crate) fn new(id: CoachId, name: String) -> Self {
        Coach {
            id,
            name,
            picks: Vec::new(),
        }
    }

    /// Whether `player` is on this coach's pick list.
    pub fn has_pick(&self, player: &str) -> bool {
        self.picks.iter().any(|p| p == player)
    }

    /// Append `player` unless already present.
    pub(crate) fn add_pick(&mut self, player: &str) {
        if !self.has_pick(player) {
            self.picks.push(player.to_string());
        }
    }

    /// Drop `player` from the pick list. Returns whether it was there.
    pub(crate) fn remove_pick(&mut self, player: &str) -> bool {
        let before = self.picks.len();
        self.picks.retain(|p| p != player);
        self.picks.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_pick_skips_duplicates() {
        let mut coach = Coach::new(CoachId::new(1), "Ann".into());
        coach.add_pick("Bo");
        coach.add_pick("Cy");
        coach.add_pick("Bo");
        assert_eq!(coach.picks, vec!["Bo", "Cy"]);
    }

    #[test]
    fn remove_pick_reports_presence() {
        let mut coach = Coach::new(CoachId::new(1), "Ann".into());
        coach.add_pick("Bo");
        assert!(coach.remove_pick("Bo"));
        assert!(!coach.remove_pick("Bo"));
        assert!(coach.picks.is_empty());
    }

    #[test]
    fn id_display() {
        assert_eq!(CoachId::new(7).to_string(), "coach#7");
    }
}
