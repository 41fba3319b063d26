// Draft engine: routes every mutation through `DraftState` and notifies
// subscribers once the mutation has completed.

use tracing::{debug, info};

use super::coach::{Coach, CoachId};
use crate::names::parse_names;
use super::state::{DraftError, DraftState, Toggle};

/// Describes a completed mutation. Passed to every subscriber along with
/// the post-mutation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftChange {
    PlayersLoaded { count: usize },
    PlayersCleared,
    AvailabilityChanged { index: Option<usize> },
    CoachAdded { id: CoachId },
    CoachRemoved { id: CoachId, unassigned: usize },
    CoachesCleared,
    TurnChanged { index: usize },
    Assigned {
        player: String,
        coach: CoachId,
        previous: Option<CoachId>,
    },
    Unassigned { player: String, coach: CoachId },
    AutoAssigned { count: usize },
}

impl DraftChange {
    /// Whether this change put a player with a coach.
    pub fn is_pick(&self) -> bool {
        matches!(
            self,
            DraftChange::Assigned { .. } | DraftChange::AutoAssigned { .. }
        )
    }
}

/// Handle returned by [`DraftEngine::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&DraftChange, &DraftState) + Send>;

/// One draft session: the state plus whoever is watching it.
#[derive(Default)]
pub struct DraftEngine {
    state: DraftState,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl DraftEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing state.
    pub fn with_state(state: DraftState) -> Self {
        DraftEngine {
            state,
            ..Self::default()
        }
    }

    /// Read access for renderers and exporters.
    pub fn state(&self) -> &DraftState {
        &self.state
    }

    /// Register a callback that runs synchronously after every mutation,
    /// in registration order.
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&DraftChange, &DraftState) + Send + 'static,
    {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Drop a subscriber. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn publish(&mut self, change: DraftChange) {
        debug_assert!(
            self.state.invariant_violations().is_empty(),
            "draft invariants broken after {change:?}: {:?}",
            self.state.invariant_violations()
        );
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&change, &self.state);
        }
    }

    // --- Roster ---

    pub fn load_players<I, S>(&mut self, names: I) -> Result<usize, DraftError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let count = self.state.load_players(names)?;
        info!("Loaded {} players (previous picks discarded)", count);
        self.publish(DraftChange::PlayersLoaded { count });
        Ok(count)
    }

    pub fn load_players_text(&mut self, raw: &str) -> Result<usize, DraftError> {
        self.load_players(parse_names(raw))
    }

    pub fn clear_players(&mut self) {
        self.state.clear_players();
        info!("Cleared all players");
        self.publish(DraftChange::PlayersCleared);
    }

    pub fn set_availability(&mut self, player_index: usize, available: bool) -> bool {
        if !self.state.set_availability(player_index, available) {
            debug!("Availability unchanged for player index {}", player_index);
            return false;
        }
        self.publish(DraftChange::AvailabilityChanged {
            index: Some(player_index),
        });
        true
    }

    pub fn mark_all_available(&mut self, available: bool) -> usize {
        let changed = self.state.mark_all_available(available);
        if changed > 0 {
            info!("Marked {} players available={}", changed, available);
            self.publish(DraftChange::AvailabilityChanged { index: None });
        }
        changed
    }

    // --- Coaches ---

    pub fn add_coach(&mut self, name: Option<&str>) -> CoachId {
        let id = self.state.add_coach(name);
        self.coach_added(id);
        id
    }

    /// Add every parsed name as a coach. Subscribers hear about each one.
    pub fn add_coaches_text(&mut self, raw: &str) -> Result<Vec<CoachId>, DraftError> {
        let ids = self.state.add_coaches_text(raw)?;
        for &id in &ids {
            self.coach_added(id);
        }
        Ok(ids)
    }

    fn coach_added(&mut self, id: CoachId) {
        if let Some(coach) = self.state.coach(id) {
            info!("Added coach '{}' ({})", coach.name, id);
        }
        self.publish(DraftChange::CoachAdded { id });
    }

    pub fn remove_coach(&mut self, id: CoachId) -> Option<Coach> {
        let Some(removed) = self.state.remove_coach(id) else {
            debug!("Remove ignored: {} not found", id);
            return None;
        };
        let unassigned = removed.picks.len();
        info!(
            "Removed coach '{}' ({}), {} players unassigned",
            removed.name, id, unassigned
        );
        self.publish(DraftChange::CoachRemoved { id, unassigned });
        Some(removed)
    }

    pub fn clear_coaches(&mut self) {
        self.state.clear_coaches();
        info!("Cleared all coaches");
        self.publish(DraftChange::CoachesCleared);
    }

    // --- Turn order ---

    pub fn select_coach(&mut self, index: usize) -> bool {
        if !self.state.select_coach(index) {
            debug!("Select ignored: no coach at index {}", index);
            return false;
        }
        self.publish(DraftChange::TurnChanged { index });
        true
    }

    pub fn advance_turn(&mut self) -> Option<usize> {
        let Some(index) = self.state.advance_turn() else {
            debug!("Advance ignored: no coaches");
            return None;
        };
        if let Some(coach) = self.state.current_coach() {
            info!("Turn passes to '{}'", coach.name);
        }
        self.publish(DraftChange::TurnChanged { index });
        Some(index)
    }

    // --- Assignment ---

    pub fn toggle_assign(&mut self, player_index: usize) -> Result<Option<Toggle>, DraftError> {
        let Some(toggle) = self.state.toggle_assign(player_index)? else {
            debug!("Toggle ignored: no player at index {}", player_index);
            return Ok(None);
        };

        let change = match &toggle {
            Toggle::Assigned {
                player,
                coach,
                previous,
            } => {
                info!("{} picked by {} (previously {:?})", player, coach, previous);
                DraftChange::Assigned {
                    player: player.clone(),
                    coach: *coach,
                    previous: *previous,
                }
            }
            Toggle::Unassigned { player, coach } => {
                info!("{} returned to the pool by {}", player, coach);
                DraftChange::Unassigned {
                    player: player.clone(),
                    coach: *coach,
                }
            }
        };
        self.publish(change);
        Ok(Some(toggle))
    }

    pub fn unassign(&mut self, coach_id: CoachId, player_name: &str) -> bool {
        if !self.state.unassign(coach_id, player_name) {
            debug!("Unassign ignored: {} not held by {}", player_name, coach_id);
            return false;
        }
        info!("{} returned to the pool by {}", player_name, coach_id);
        self.publish(DraftChange::Unassigned {
            player: player_name.to_string(),
            coach: coach_id,
        });
        true
    }

    pub fn auto_assign_remaining(&mut self) -> Result<usize, DraftError> {
        let count = self.state.auto_assign_remaining()?;
        info!("Auto-assigned {} remaining players", count);
        if count > 0 {
            self.publish(DraftChange::AutoAssigned { count });
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder(engine: &mut DraftEngine) -> Arc<Mutex<Vec<DraftChange>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        engine.subscribe(move |change, _| sink.lock().unwrap().push(change.clone()));
        log
    }

    #[test]
    fn mutations_notify_subscribers() {
        let mut engine = DraftEngine::new();
        let log = recorder(&mut engine);

        engine.load_players(["A", "B"]).unwrap();
        let ann = engine.add_coach(Some("Ann"));
        engine.toggle_assign(1).unwrap();
        engine.advance_turn();

        let changes = log.lock().unwrap().clone();
        assert_eq!(
            changes,
            vec![
                DraftChange::PlayersLoaded { count: 2 },
                DraftChange::CoachAdded { id: ann },
                DraftChange::Assigned {
                    player: "B".into(),
                    coach: ann,
                    previous: None,
                },
                DraftChange::TurnChanged { index: 0 },
            ]
        );
    }

    #[test]
    fn subscribers_see_post_mutation_state() {
        let mut engine = DraftEngine::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        engine.subscribe(move |_, state| sink.lock().unwrap().push(state.counts().assigned));

        engine.load_players(["A", "B", "C"]).unwrap();
        engine.add_coach(None);
        engine.auto_assign_remaining().unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![0, 0, 3]);
    }

    #[test]
    fn soft_failures_and_noops_do_not_notify() {
        let mut engine = DraftEngine::new();
        let log = recorder(&mut engine);

        assert_eq!(engine.load_players_text(""), Err(DraftError::NoPlayers));
        assert_eq!(engine.toggle_assign(0), Err(DraftError::NoCoaches));
        assert_eq!(engine.auto_assign_remaining(), Err(DraftError::NoCoaches));
        assert_eq!(engine.advance_turn(), None);
        assert!(!engine.select_coach(3));
        assert!(!engine.set_availability(0, true));
        assert_eq!(engine.mark_all_available(true), 0);

        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn subscribers_run_in_registration_order() {
        let mut engine = DraftEngine::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second"] {
            let sink = Arc::clone(&order);
            engine.subscribe(move |_, _| sink.lock().unwrap().push(tag));
        }
        engine.add_coach(None);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut engine = DraftEngine::new();
        let log = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&log);
        let id = engine.subscribe(move |_, _| *sink.lock().unwrap() += 1);

        engine.add_coach(None);
        assert!(engine.unsubscribe(id));
        assert!(!engine.unsubscribe(id));
        engine.add_coach(None);

        assert_eq!(*log.lock().unwrap(), 1);
        assert_eq!(engine.subscriber_count(), 0);
    }

    #[test]
    fn remove_coach_reports_cascade_size() {
        let mut engine = DraftEngine::new();
        engine.load_players(["A", "B", "C"]).unwrap();
        let ann = engine.add_coach(Some("Ann"));
        engine.auto_assign_remaining().unwrap();
        let log = recorder(&mut engine);

        engine.remove_coach(ann);
        assert_eq!(
            log.lock().unwrap().as_slice(),
            &[DraftChange::CoachRemoved { id: ann, unassigned: 3 }]
        );
        assert_eq!(engine.state().counts().assigned, 0);
    }

    #[test]
    fn add_coaches_text_notifies_once_per_coach() {
        let mut engine = DraftEngine::new();
        let log = recorder(&mut engine);
        let ids = engine.add_coaches_text("Ann\nBen\nAnn").unwrap();
        assert_eq!(ids.len(), 2);
        let expected: Vec<_> = ids.iter().map(|&id| DraftChange::CoachAdded { id }).collect();
        assert_eq!(*log.lock().unwrap(), expected);
        assert_eq!(engine.state().coach(ids[1]).unwrap().name, "Ben");
        assert_eq!(engine.add_coaches_text(""), Err(DraftError::NoCoachNames));
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn text_loading_matches_name_loading() {
        let mut engine = DraftEngine::new();
        let log = recorder(&mut engine);
        assert_eq!(engine.load_players_text("Ava; Ben, Ava"), Ok(2));
        assert_eq!(engine.load_players(["Cy"]), Ok(1));
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                DraftChange::PlayersLoaded { count: 2 },
                DraftChange::PlayersLoaded { count: 1 },
            ]
        );
    }

    #[test]
    fn is_pick_classification() {
        assert!(DraftChange::AutoAssigned { count: 1 }.is_pick());
        assert!(!DraftChange::PlayersCleared.is_pick());
    }
}
