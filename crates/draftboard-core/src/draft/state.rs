// Draft state: roster, coaches, per-coach picks, and whose turn it is.
//
// A player's `assigned_to` and membership in a coach's `picks` are two views
// of the same fact. Every operation here updates both together.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::coach::{Coach, CoachId};
use super::player::{Player, PlayerStatus};
use crate::names::parse_names;

/// Problems the user can fix. These never abort the session; the caller
/// shows them as a transient notice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Add at least one coach first.")]
    NoCoaches,
    #[error("No player names found in the input.")]
    NoPlayers,
    #[error("No coach names found in the input.")]
    NoCoachNames,
    #[error("No available (unassigned) players to export.")]
    NothingToExport,
}

/// What `toggle_assign` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle {
    /// The player now belongs to `coach`. `previous` is the coach they were
    /// taken from, if any.
    Assigned {
        player: String,
        coach: CoachId,
        previous: Option<CoachId>,
    },
    /// The player was already with `coach` and is now unassigned.
    Unassigned { player: String, coach: CoachId },
}

/// Roster totals for status displays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftCounts {
    /// Players on the roster.
    pub total: usize,
    /// Players flagged available and not yet assigned.
    pub open: usize,
    /// Players assigned to some coach.
    pub assigned: usize,
    /// Coaches in the rotation.
    pub coaches: usize,
}

/// A player row as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRow {
    pub name: String,
    pub available: bool,
    #[serde(flatten)]
    pub status: PlayerStatus,
}

/// A coach card as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachRow {
    pub id: CoachId,
    pub name: String,
    pub picks: Vec<String>,
    pub on_the_clock: bool,
}

impl CoachRow {
    pub fn pick_count(&self) -> usize {
        self.picks.len()
    }
}

/// Read-only copy of the whole board, taken at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSnapshot {
    pub players: Vec<PlayerRow>,
    pub coaches: Vec<CoachRow>,
    /// Index into `coaches` of the coach on the clock.
    pub current: Option<usize>,
    pub counts: DraftCounts,
}

impl DraftSnapshot {
    pub fn current_coach(&self) -> Option<&CoachRow> {
        self.current.and_then(|i| self.coaches.get(i))
    }
}

/// The complete state of one draft session.
#[derive(Debug, Clone, Default)]
pub struct DraftState {
    players: Vec<Player>,
    /// Rotation order.
    coaches: Vec<Coach>,
    /// Index into `coaches` for the coach on the clock. `None` iff there
    /// are no coaches.
    current: Option<usize>,
    /// Last issued coach id.
    last_coach_id: u64,
}

impl DraftState {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Roster ---

    /// Replace the whole roster with fresh, unavailable, unassigned entries.
    ///
    /// This is a destructive reset: every coach's pick list is emptied too.
    /// Blank and repeated names are dropped. An empty list is reported and
    /// leaves the current roster alone.
    pub fn load_players<I, S>(&mut self, names: I) -> Result<usize, DraftError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let players: Vec<Player> = names
            .into_iter()
            .map(|n| n.into().trim().to_string())
            .filter(|n| !n.is_empty() && seen.insert(n.clone()))
            .map(Player::new)
            .collect();

        if players.is_empty() {
            return Err(DraftError::NoPlayers);
        }

        for coach in &mut self.coaches {
            coach.picks.clear();
        }
        self.players = players;
        Ok(self.players.len())
    }

    /// Parse free text and load it as the roster.
    pub fn load_players_text(&mut self, raw: &str) -> Result<usize, DraftError> {
        self.load_players(parse_names(raw))
    }

    /// Drop every player and every pick.
    pub fn clear_players(&mut self) {
        self.players.clear();
        for coach in &mut self.coaches {
            coach.picks.clear();
        }
    }

    /// Set one player's availability flag. Returns false when the index is
    /// out of range or the flag already had that value.
    pub fn set_availability(&mut self, player_index: usize, available: bool) -> bool {
        match self.players.get_mut(player_index) {
            Some(p) if p.available != available => {
                p.available = available;
                true
            }
            _ => false,
        }
    }

    /// Set every player's availability flag. Returns how many changed.
    pub fn mark_all_available(&mut self, available: bool) -> usize {
        let mut changed = 0;
        for p in self.players.iter_mut().filter(|p| p.available != available) {
            p.available = available;
            changed += 1;
        }
        changed
    }

    // --- Coaches ---

    /// Append a coach. A missing or blank name becomes `"Coach N"`.
    ///
    /// The first coach added goes on the clock.
    pub fn add_coach(&mut self, name: Option<&str>) -> CoachId {
        let name = match name.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => format!("Coach {}", self.coaches.len() + 1),
        };

        self.last_coach_id += 1;
        let id = CoachId::new(self.last_coach_id);
        self.coaches.push(Coach::new(id, name));
        if self.coaches.len() == 1 {
            self.current = Some(0);
        }
        id
    }

    /// Parse free text and add one coach per name, in order.
    pub fn add_coaches_text(&mut self, raw: &str) -> Result<Vec<CoachId>, DraftError> {
        let names = parse_names(raw);
        if names.is_empty() {
            return Err(DraftError::NoCoachNames);
        }
        Ok(names.iter().map(|n| self.add_coach(Some(n))).collect())
    }

    /// Remove a coach, unassigning everyone they picked.
    ///
    /// Unknown ids are a no-op. The turn index is clamped into the shorter
    /// list, or cleared when no coaches remain.
    pub fn remove_coach(&mut self, id: CoachId) -> Option<Coach> {
        let idx = self.coach_index(id)?;

        for p in &mut self.players {
            if p.assigned_to == Some(id) {
                p.assigned_to = None;
            }
        }
        let removed = self.coaches.remove(idx);

        self.current = if self.coaches.is_empty() {
            None
        } else {
            Some(self.current.unwrap_or(0).min(self.coaches.len() - 1))
        };
        Some(removed)
    }

    /// Remove every coach and unassign every player.
    pub fn clear_coaches(&mut self) {
        self.coaches.clear();
        for p in &mut self.players {
            p.assigned_to = None;
        }
        self.current = None;
    }

    // --- Turn order ---

    /// Put the coach at `index` on the clock. Out of range is a no-op.
    pub fn select_coach(&mut self, index: usize) -> bool {
        if index >= self.coaches.len() {
            return false;
        }
        self.current = Some(index);
        true
    }

    /// Move the clock to the next coach, wrapping at the end.
    pub fn advance_turn(&mut self) -> Option<usize> {
        let len = self.coaches.len();
        let current = self.current?;
        if len == 0 {
            return None;
        }
        let next = (current + 1) % len;
        self.current = Some(next);
        Some(next)
    }

    // --- Assignment ---

    /// Assign the player at `player_index` to the coach on the clock, or
    /// unassign them if that coach already has them.
    ///
    /// Taking a player from another coach removes them from that coach's
    /// picks first. An out-of-range index is a silent no-op (`Ok(None)`).
    pub fn toggle_assign(&mut self, player_index: usize) -> Result<Option<Toggle>, DraftError> {
        let current = match self.current {
            Some(c) if c < self.coaches.len() => c,
            _ => return Err(DraftError::NoCoaches),
        };
        let coach_id = self.coaches[current].id;

        let Some(player) = self.players.get_mut(player_index) else {
            return Ok(None);
        };
        let name = player.name.clone();

        if player.assigned_to == Some(coach_id) {
            player.assigned_to = None;
            self.coaches[current].remove_pick(&name);
            return Ok(Some(Toggle::Unassigned {
                player: name,
                coach: coach_id,
            }));
        }

        let previous = player.assigned_to.replace(coach_id);
        if let Some(prev_id) = previous {
            if let Some(prev) = self.coaches.iter_mut().find(|c| c.id == prev_id) {
                prev.remove_pick(&name);
            }
        }
        self.coaches[current].add_pick(&name);

        Ok(Some(Toggle::Assigned {
            player: name,
            coach: coach_id,
            previous,
        }))
    }

    /// Take `player_name` off `coach_id`'s pick list.
    ///
    /// Unknown coaches are a no-op. Returns whether anything changed.
    pub fn unassign(&mut self, coach_id: CoachId, player_name: &str) -> bool {
        let Some(coach) = self.coaches.iter_mut().find(|c| c.id == coach_id) else {
            return false;
        };
        let removed = coach.remove_pick(player_name);

        let mut cleared = false;
        if let Some(p) = self.players.iter_mut().find(|p| p.name == player_name) {
            if p.assigned_to == Some(coach_id) {
                p.assigned_to = None;
                cleared = true;
            }
        }
        removed || cleared
    }

    /// Hand every unassigned player out round-robin, starting with the coach
    /// on the clock. Players that already have a coach are skipped without
    /// using up a turn. The clock itself does not move.
    ///
    /// Returns how many players were assigned.
    pub fn auto_assign_remaining(&mut self) -> Result<usize, DraftError> {
        let start = match self.current {
            Some(c) if c < self.coaches.len() => c,
            _ => return Err(DraftError::NoCoaches),
        };
        let num_coaches = self.coaches.len();

        let mut cursor = start;
        let mut assigned = 0;
        for player in self.players.iter_mut().filter(|p| p.assigned_to.is_none()) {
            let coach = &mut self.coaches[cursor];
            player.assigned_to = Some(coach.id);
            coach.add_pick(&player.name);
            cursor = (cursor + 1) % num_coaches;
            assigned += 1;
        }
        Ok(assigned)
    }

    // --- Read accessors ---

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    pub fn coaches(&self) -> &[Coach] {
        &self.coaches
    }

    pub fn coach(&self, id: CoachId) -> Option<&Coach> {
        self.coaches.iter().find(|c| c.id == id)
    }

    pub fn coach_index(&self, id: CoachId) -> Option<usize> {
        self.coaches.iter().position(|c| c.id == id)
    }

    /// Index of the coach on the clock; `None` when there are no coaches.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_coach(&self) -> Option<&Coach> {
        self.current.and_then(|i| self.coaches.get(i))
    }

    /// Display status of the player at `index`.
    pub fn player_status(&self, index: usize) -> Option<PlayerStatus> {
        self.players.get(index).map(|p| self.status_of(p))
    }

    fn status_of(&self, player: &Player) -> PlayerStatus {
        match player.assigned_to.and_then(|id| self.coach(id)) {
            Some(coach) => PlayerStatus::PickedBy {
                coach: coach.name.clone(),
            },
            None if player.available => PlayerStatus::Available,
            None => PlayerStatus::Unavailable,
        }
    }

    /// Names of players flagged available and not yet assigned, in roster
    /// order. This is what gets exported.
    pub fn available_unassigned(&self) -> Vec<&str> {
        self.players
            .iter()
            .filter(|p| p.is_open())
            .map(|p| p.name.as_str())
            .collect()
    }

    pub fn counts(&self) -> DraftCounts {
        DraftCounts {
            total: self.players.len(),
            open: self.players.iter().filter(|p| p.is_open()).count(),
            assigned: self.players.iter().filter(|p| p.is_assigned()).count(),
            coaches: self.coaches.len(),
        }
    }

    /// Whether every player on a non-empty roster has a coach.
    pub fn is_complete(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(Player::is_assigned)
    }

    pub fn snapshot(&self) -> DraftSnapshot {
        DraftSnapshot {
            players: self
                .players
                .iter()
                .map(|p| PlayerRow {
                    name: p.name.clone(),
                    available: p.available,
                    status: self.status_of(p),
                })
                .collect(),
            coaches: self
                .coaches
                .iter()
                .enumerate()
                .map(|(i, c)| CoachRow {
                    id: c.id,
                    name: c.name.clone(),
                    picks: c.picks.clone(),
                    on_the_clock: self.current == Some(i),
                })
                .collect(),
            current: self.current,
            counts: self.counts(),
        }
    }

    /// Every way the current state breaks the roster/pick invariants.
    /// Empty means consistent.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut problems = Vec::new();

        match (self.current, self.coaches.len()) {
            (None, 0) => {}
            (Some(i), len) if i < len => {}
            (current, len) => {
                problems.push(format!("turn index {current:?} invalid for {len} coaches"))
            }
        }

        for p in &self.players {
            if let Some(id) = p.assigned_to {
                match self.coach(id) {
                    Some(c) if c.has_pick(&p.name) => {}
                    Some(c) => problems.push(format!(
                        "{} assigned to {} but missing from their picks",
                        p.name, c.name
                    )),
                    None => problems.push(format!("{} assigned to unknown {id}", p.name)),
                }
            }
        }

        let mut owners: HashSet<&str> = HashSet::new();
        for c in &self.coaches {
            for name in &c.picks {
                if !owners.insert(name.as_str()) {
                    problems.push(format!("{name} appears in more than one pick list"));
                }
                let owned = self
                    .players
                    .iter()
                    .any(|p| &p.name == name && p.assigned_to == Some(c.id));
                if !owned {
                    problems.push(format!(
                        "{name} in {}'s picks but not assigned to them",
                        c.name
                    ));
                }
            }
        }

        problems
    }
}
