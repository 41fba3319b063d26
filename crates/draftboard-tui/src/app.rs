// Application state and orchestration logic.
//
// The central event loop that owns the draft session. It applies user
// commands from the TUI and turn-timer events to the draft engine, and pushes
// snapshots, timer readings and notices to the TUI render loop.

use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use draftboard_core::draft::{DraftChange, DraftEngine, DraftError};
use draftboard_core::export::{available_players_text, board_json, ExportSink, FileExport};
use draftboard_core::notice::NoticeBoard;
use draftboard_core::snake::snake_order;
use draftboard_core::timer::{TimerEvent, TurnTimer};

use crate::config::Config;
use crate::protocol::{UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// How often the event loop checks whether the current notice has expired.
pub const NOTICE_CHECK_INTERVAL: Duration = Duration::from_millis(250);

/// Shown when a coach runs out of time.
pub const TIME_UP_NOTICE: &str = "Time's up! Skipping to the next coach.";

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub engine: DraftEngine,
    /// Per-turn countdown. `None` when the timer is disabled in config.
    pub timer: Option<TurnTimer>,
    pub notices: NoticeBoard,
    pub available_sink: Box<dyn ExportSink>,
    pub board_sink: Box<dyn ExportSink>,
    /// Engine changes not yet forwarded to the TUI. Fed by an engine
    /// subscriber registered in `new`.
    changes: mpsc::UnboundedReceiver<DraftChange>,
}

impl AppState {
    /// Create the session. Timer events are sent through `timer_tx`; exports
    /// go to the files named in config.
    pub fn new(config: Config, timer_tx: mpsc::Sender<TimerEvent>) -> Self {
        let timer = config
            .timer
            .enabled
            .then(|| TurnTimer::new(config.timer.turn_duration(), timer_tx));
        let notices = NoticeBoard::new(config.notice.ttl());
        let available_sink: Box<dyn ExportSink> =
            Box::new(FileExport::new(config.resolve(&config.export.available_path)));
        let board_sink: Box<dyn ExportSink> =
            Box::new(FileExport::new(config.resolve(&config.export.board_path)));

        let mut engine = DraftEngine::new();
        let (change_tx, changes) = mpsc::unbounded_channel();
        engine.subscribe(move |change, _| {
            let _ = change_tx.send(change.clone());
        });

        AppState {
            config,
            engine,
            timer,
            notices,
            available_sink,
            board_sink,
            changes,
        }
    }

    /// Replace the export destinations.
    pub fn with_sinks(mut self, available: Box<dyn ExportSink>, board: Box<dyn ExportSink>) -> Self {
        self.available_sink = available;
        self.board_sink = board;
        self
    }

    /// Load the player and coach lists named in config, if any.
    ///
    /// A missing file is an error; a file with no names in it is only logged.
    pub fn load_startup_lists(&mut self) -> anyhow::Result<()> {
        if let Some(file) = self.config.draft.players_file.clone() {
            let path = self.config.resolve(&file);
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read players file {}", path.display()))?;
            match self.engine.load_players_text(&text) {
                Ok(count) => info!("Loaded {} players from {}", count, path.display()),
                Err(e) => warn!("{}: {}", path.display(), e),
            }
        }

        if let Some(file) = self.config.draft.coaches_file.clone() {
            let path = self.config.resolve(&file);
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read coaches file {}", path.display()))?;
            match self.engine.add_coaches_text(&text) {
                Ok(ids) => info!("Loaded {} coaches from {}", ids.len(), path.display()),
                Err(e) => warn!("{}: {}", path.display(), e),
            }
        }

        Ok(())
    }

    /// Whether a turn can be on the clock: some coach is up and there are
    /// still unassigned players to pick from.
    pub fn draft_active(&self) -> bool {
        let state = self.engine.state();
        state.current_index().is_some() && !state.players().is_empty() && !state.is_complete()
    }

    /// Drain pending engine changes. Returns `None` if nothing changed,
    /// otherwise whether any change should restart the turn clock.
    fn drain_changes(&mut self) -> Option<bool> {
        let mut changed = false;
        let mut restart = false;
        while let Ok(change) = self.changes.try_recv() {
            debug!("Draft change: {:?}", change);
            changed = true;
            restart |= restarts_turn(&change);
        }
        changed.then_some(restart)
    }
}

/// Loading a roster, making a pick, or moving the turn gives the coach on
/// the clock a fresh countdown.
fn restarts_turn(change: &DraftChange) -> bool {
    matches!(
        change,
        DraftChange::PlayersLoaded { .. }
            | DraftChange::TurnChanged { .. }
            | DraftChange::Assigned { .. }
            | DraftChange::AutoAssigned { .. }
    )
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on two channels using `tokio::select!`:
/// 1. User commands from the TUI
/// 2. Turn timer events
///
/// plus a periodic notice-expiry check. Pushes UI updates through `ui_tx`
/// for the TUI render loop.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut timer_rx: mpsc::Receiver<TimerEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    // Changes made before the loop started (startup lists) are folded into
    // the first snapshot.
    state.drain_changes();
    sync_timer(&mut state, false, &ui_tx).await;
    send_snapshot(&mut state, &ui_tx).await;

    // When the timer is disabled its sender is dropped; stop polling the
    // closed channel so select! never spins on it.
    let mut timer_open = true;

    let mut notice_interval = tokio::time::interval(NOTICE_CHECK_INTERVAL);
    notice_interval.tick().await;

    loop {
        tokio::select! {
            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- Turn timer events (only poll when channel is open) ---
            event = timer_rx.recv(), if timer_open => {
                match event {
                    Some(event) => {
                        handle_timer_event(&mut state, event, &ui_tx).await;
                    }
                    None => {
                        debug!("Timer channel closed");
                        timer_open = false;
                    }
                }
            }

            // --- Notice expiry ---
            _ = notice_interval.tick() => {
                if state.notices.expire(Instant::now()) {
                    let _ = ui_tx.send(UiUpdate::Notice(None)).await;
                }
            }
        }

        flush_changes(&mut state, &ui_tx).await;
    }

    if let Some(timer) = state.timer.as_mut() {
        timer.cancel();
    }
    info!("Application event loop exiting");
    Ok(())
}

/// Forward pending engine changes: adjust the turn clock, then push a fresh
/// snapshot.
async fn flush_changes(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let Some(restart) = state.drain_changes() else {
        return;
    };
    sync_timer(state, restart, ui_tx).await;
    send_snapshot(state, ui_tx).await;
}

async fn send_snapshot(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.engine.state().snapshot();
    let _ = ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await;
}

/// Bring the turn clock in line with the draft: stopped when no turn can be
/// taken, restarted on request, started if idle.
async fn sync_timer(state: &mut AppState, restart: bool, ui_tx: &mpsc::Sender<UiUpdate>) {
    let active = state.draft_active();
    let Some(timer) = state.timer.as_mut() else {
        return;
    };

    if !active {
        if timer.cancel() {
            info!("Turn timer stopped");
            let _ = ui_tx.send(UiUpdate::Timer(None)).await;
        }
        return;
    }

    if restart || !timer.is_running() {
        timer.start();
    }
}

/// Show a notice to the user.
async fn post_notice(state: &mut AppState, message: String, ui_tx: &mpsc::Sender<UiUpdate>) {
    state.notices.post(message.clone());
    let _ = ui_tx.send(UiUpdate::Notice(Some(message))).await;
}

/// Report a soft failure as a notice.
async fn soft_fail(state: &mut AppState, error: DraftError, ui_tx: &mpsc::Sender<UiUpdate>) {
    warn!("{}", error);
    post_notice(state, error.to_string(), ui_tx).await;
}

/// Handle an event from the turn timer.
async fn handle_timer_event(
    state: &mut AppState,
    event: TimerEvent,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    let (is_current, current) = match state.timer.as_ref() {
        Some(timer) => (timer.is_current(event.generation()), timer.generation()),
        None => return,
    };
    if !is_current {
        debug!(
            "Discarding stale timer event from generation {} (current: {})",
            event.generation(),
            current
        );
        return;
    }

    match event {
        TimerEvent::Tick { remaining, .. } => {
            let _ = ui_tx.send(UiUpdate::Timer(Some(remaining))).await;
        }
        TimerEvent::Expired { .. } => {
            info!("Turn timer expired");
            let _ = ui_tx.send(UiUpdate::Timer(Some(Duration::ZERO))).await;
            state.engine.advance_turn();
            post_notice(state, TIME_UP_NOTICE.to_string(), ui_tx).await;
        }
    }
}

/// Handle a user command from the TUI.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::LoadPlayers(text) => match state.engine.load_players_text(&text) {
            Ok(count) => post_notice(state, format!("Loaded {count} players."), ui_tx).await,
            Err(e) => soft_fail(state, e, ui_tx).await,
        },
        UserCommand::AddCoaches(text) => {
            if text.trim().is_empty() {
                state.engine.add_coach(None);
            } else if let Err(e) = state.engine.add_coaches_text(&text) {
                soft_fail(state, e, ui_tx).await;
            }
        }
        UserCommand::RemoveCoach(id) => {
            if let Some(removed) = state.engine.remove_coach(id) {
                if !removed.picks.is_empty() {
                    let message = format!(
                        "Removed {}; {} players returned to the pool.",
                        removed.name,
                        removed.picks.len()
                    );
                    post_notice(state, message, ui_tx).await;
                }
            }
        }
        UserCommand::ClearPlayers => state.engine.clear_players(),
        UserCommand::ClearCoaches => state.engine.clear_coaches(),
        UserCommand::SetAvailability {
            player_index,
            available,
        } => {
            state.engine.set_availability(player_index, available);
        }
        UserCommand::MarkAll { available } => {
            state.engine.mark_all_available(available);
        }
        UserCommand::SelectCoach(index) => {
            state.engine.select_coach(index);
        }
        UserCommand::NextCoach => {
            if state.engine.advance_turn().is_none() {
                soft_fail(state, DraftError::NoCoaches, ui_tx).await;
            }
        }
        UserCommand::ToggleAssign(index) => {
            if let Err(e) = state.engine.toggle_assign(index) {
                soft_fail(state, e, ui_tx).await;
            }
        }
        UserCommand::Unassign { coach, player } => {
            state.engine.unassign(coach, &player);
        }
        UserCommand::AutoAssign => match state.engine.auto_assign_remaining() {
            Ok(0) => post_notice(state, "No unassigned players left.".to_string(), ui_tx).await,
            Ok(count) => {
                post_notice(state, format!("Auto-assigned {count} players."), ui_tx).await
            }
            Err(e) => soft_fail(state, e, ui_tx).await,
        },
        UserCommand::PreviewOrder => preview_order(state, ui_tx).await,
        UserCommand::ExportAvailable => export_available(state, ui_tx).await,
        UserCommand::ExportBoard => export_board(state, ui_tx).await,
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

/// Compute the snake order for the current rosters and send it to the TUI.
/// Read-only: the engine is not touched.
async fn preview_order(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let order = {
        let draft = state.engine.state();
        let players: Vec<&str> = draft.players().iter().map(|p| p.name.as_str()).collect();
        let coaches: Vec<&str> = draft.coaches().iter().map(|c| c.name.as_str()).collect();
        snake_order(&players, &coaches)
    };

    match order {
        Ok(order) => {
            info!("Previewing snake order of {} picks", order.len());
            let _ = ui_tx.send(UiUpdate::DraftOrder(order)).await;
        }
        Err(e) => {
            warn!("{}", e);
            post_notice(state, e.to_string(), ui_tx).await;
        }
    }
}

async fn export_available(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let text = match available_players_text(state.engine.state()) {
        Ok(text) => text,
        Err(e) => return soft_fail(state, e, ui_tx).await,
    };
    let count = text.lines().count();

    let message = match state.available_sink.export(&text).await {
        Ok(receipt) => format!("Exported {count} players to {}.", receipt.destination),
        Err(e) => {
            warn!("Export failed: {}", e);
            format!("Export failed: {e}")
        }
    };
    post_notice(state, message, ui_tx).await;
}

async fn export_board(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let json = match board_json(&state.engine.state().snapshot()) {
        Ok(json) => json,
        Err(e) => {
            warn!("Export failed: {}", e);
            return post_notice(state, format!("Export failed: {e}"), ui_tx).await;
        }
    };

    let message = match state.board_sink.export(&json).await {
        Ok(receipt) => format!("Exported draft board to {}.", receipt.destination),
        Err(e) => {
            warn!("Export failed: {}", e);
            format!("Export failed: {e}")
        }
    };
    post_notice(state, message, ui_tx).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
