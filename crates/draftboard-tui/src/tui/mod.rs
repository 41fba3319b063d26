// TUI draft board: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the draft as last reported by the
// app orchestrator. The orchestrator pushes `UiUpdate` messages over an mpsc
// channel; the TUI applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use draftboard_core::draft::{CoachId, CoachRow, DraftSnapshot, PlayerRow, PlayerStatus};
use draftboard_core::snake::PickSlot;

use crate::protocol::{UiUpdate, UserCommand};
use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// Interaction modes
// ---------------------------------------------------------------------------

/// Which list the cursor keys move through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Players,
    Coaches,
}

/// What a text entry box will be submitted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    Players,
    Coaches,
}

/// An open text entry box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub target: InputTarget,
    pub buffer: String,
}

impl TextInput {
    pub fn new(target: InputTarget) -> Self {
        TextInput {
            target,
            buffer: String::new(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.target {
            InputTarget::Players => " Player names (replaces roster) ",
            InputTarget::Coaches => " Coach names (blank adds one) ",
        }
    }

    /// The command this entry submits as.
    pub fn into_command(self) -> UserCommand {
        match self.target {
            InputTarget::Players => UserCommand::LoadPlayers(self.buffer),
            InputTarget::Coaches => UserCommand::AddCoaches(self.buffer),
        }
    }
}

/// A destructive action waiting for a yes/no answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingConfirm {
    Quit,
    ClearPlayers,
    ClearCoaches,
    RemoveCoach { id: CoachId, name: String },
}

impl PendingConfirm {
    pub fn question(&self) -> String {
        match self {
            PendingConfirm::Quit => "Really quit?".to_string(),
            PendingConfirm::ClearPlayers => "Clear all players?".to_string(),
            PendingConfirm::ClearCoaches => "Clear all coaches?".to_string(),
            PendingConfirm::RemoveCoach { name, .. } => format!("Remove {name}?"),
        }
    }

    pub fn into_command(self) -> UserCommand {
        match self {
            PendingConfirm::Quit => UserCommand::Quit,
            PendingConfirm::ClearPlayers => UserCommand::ClearPlayers,
            PendingConfirm::ClearCoaches => UserCommand::ClearCoaches,
            PendingConfirm::RemoveCoach { id, .. } => UserCommand::RemoveCoach(id),
        }
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
///
/// Updated incrementally via `UiUpdate` messages from the app orchestrator.
/// The `render_frame` function reads this struct to draw the board.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Latest board from the orchestrator.
    pub snapshot: DraftSnapshot,
    pub focus: Focus,
    /// Cursor position within `visible_players()`.
    pub selected_player: usize,
    /// Cursor position within the coach list.
    pub selected_coach: usize,
    /// Hide players that are unavailable or already picked.
    pub available_only: bool,
    /// Time left for the coach on the clock, if a countdown is running.
    pub timer_remaining: Option<Duration>,
    pub notice: Option<String>,
    /// Last snake order preview.
    pub draft_order: Vec<PickSlot>,
    /// Whether the preview replaces the player list.
    pub show_order: bool,
    pub order_scroll: usize,
    pub input: Option<TextInput>,
    pub confirm: Option<PendingConfirm>,
}

impl ViewState {
    /// Players currently listed, paired with their roster index.
    pub fn visible_players(&self) -> Vec<(usize, &PlayerRow)> {
        self.snapshot
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| !self.available_only || p.status == PlayerStatus::Available)
            .collect()
    }

    /// Roster index of the player under the cursor.
    pub fn selected_player_index(&self) -> Option<usize> {
        self.visible_players()
            .get(self.selected_player)
            .map(|(i, _)| *i)
    }

    pub fn selected_player_row(&self) -> Option<&PlayerRow> {
        self.selected_player_index()
            .and_then(|i| self.snapshot.players.get(i))
    }

    pub fn selected_coach_row(&self) -> Option<&CoachRow> {
        self.snapshot.coaches.get(self.selected_coach)
    }

    /// The coach holding `player`, if any.
    pub fn holder_of(&self, player: &str) -> Option<&CoachRow> {
        self.snapshot
            .coaches
            .iter()
            .find(|c| c.picks.iter().any(|p| p == player))
    }

    /// Keep both cursors inside their lists.
    pub fn clamp_selection(&mut self) {
        let players = self.visible_players().len();
        self.selected_player = self.selected_player.min(players.saturating_sub(1));
        let coaches = self.snapshot.coaches.len();
        self.selected_coach = self.selected_coach.min(coaches.saturating_sub(1));
        self.order_scroll = self
            .order_scroll
            .min(self.draft_order.len().saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => {
            state.snapshot = *snapshot;
            state.clamp_selection();
        }
        UiUpdate::Timer(remaining) => {
            state.timer_remaining = remaining;
        }
        UiUpdate::Notice(message) => {
            state.notice = message;
        }
        UiUpdate::DraftOrder(order) => {
            state.draft_order = order;
            state.order_scroll = 0;
            state.show_order = true;
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete board frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::prompt::render(frame, layout.prompt, state);
    if state.show_order {
        widgets::draft_order::render(frame, layout.players, state);
    } else {
        widgets::players::render(frame, layout.players, state);
    }
    widgets::coaches::render(frame, layout.coaches, state);
    render_help_bar(frame, &layout, state);

    if let Some(confirm) = &state.confirm {
        widgets::confirm::render(frame, frame.area(), confirm);
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let text = help_text(state);
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

/// Key hints for the current mode.
pub fn help_text(state: &ViewState) -> &'static str {
    if state.confirm.is_some() {
        " y:Confirm | n/Esc:Cancel"
    } else if state.input.is_some() {
        " Enter:Submit | Esc:Cancel | separate names with newline , ; | or tab"
    } else if state.show_order {
        " j/k:Scroll | Esc/o:Close preview | q:Quit"
    } else {
        " Tab:Focus | Enter:Pick/Select | n:Next | a:Avail | m/M:All | u:Unassign | A:Auto | l:Players | c:Coaches | x:Remove | X/C:Clear | f:Filter | o:Order | e/E:Export | q:Quit"
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            // UI updates from the app orchestrator
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Channel closed: app is shutting down
                    None => break Ok(()),
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse and resize events need no handling; the next
                        // render tick redraws at the new size.
                    }
                    Some(Err(e)) => break Err(anyhow::Error::from(e)),
                    None => break Ok(()),
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::Error::from(e));
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use draftboard_core::draft::DraftEngine;

    pub(crate) fn snapshot_with(players: &str, coaches: &str) -> DraftSnapshot {
        let mut engine = DraftEngine::new();
        engine.load_players_text(players).unwrap();
        if !coaches.is_empty() {
            engine.add_coaches_text(coaches).unwrap();
        }
        engine.state().snapshot()
    }

    #[test]
    fn view_state_default_is_sensible() {
        let state = ViewState::default();
        assert!(state.snapshot.players.is_empty());
        assert_eq!(state.focus, Focus::Players);
        assert!(state.timer_remaining.is_none());
        assert!(state.notice.is_none());
        assert!(!state.show_order);
        assert!(state.input.is_none());
        assert!(state.confirm.is_none());
    }

    #[test]
    fn snapshot_update_clamps_cursors() {
        let mut state = ViewState::default();
        state.selected_player = 7;
        state.selected_coach = 3;
        apply_ui_update(
            &mut state,
            UiUpdate::Snapshot(Box::new(snapshot_with("Ava, Ben", "Ann"))),
        );
        assert_eq!(state.selected_player, 1);
        assert_eq!(state.selected_coach, 0);
    }

    #[test]
    fn timer_and_notice_updates() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Timer(Some(Duration::from_secs(42))));
        apply_ui_update(&mut state, UiUpdate::Notice(Some("hello".into())));
        assert_eq!(state.timer_remaining, Some(Duration::from_secs(42)));
        assert_eq!(state.notice.as_deref(), Some("hello"));

        apply_ui_update(&mut state, UiUpdate::Timer(None));
        apply_ui_update(&mut state, UiUpdate::Notice(None));
        assert!(state.timer_remaining.is_none());
        assert!(state.notice.is_none());
    }

    #[test]
    fn draft_order_update_opens_preview() {
        let mut state = ViewState::default();
        state.order_scroll = 5;
        let order = vec![PickSlot {
            pick_number: 1,
            round: 1,
            coach: "A".into(),
            player: "P1".into(),
        }];
        apply_ui_update(&mut state, UiUpdate::DraftOrder(order.clone()));
        assert!(state.show_order);
        assert_eq!(state.order_scroll, 0);
        assert_eq!(state.draft_order, order);
    }

    #[test]
    fn available_filter_hides_picked_and_unavailable() {
        let mut engine = DraftEngine::new();
        engine.load_players_text("Ava, Ben, Cy").unwrap();
        engine.add_coach(None);
        engine.mark_all_available(true);
        engine.toggle_assign(0).unwrap();
        engine.set_availability(2, false);

        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Snapshot(Box::new(engine.state().snapshot())));
        assert_eq!(state.visible_players().len(), 3);

        state.available_only = true;
        let visible: Vec<usize> = state.visible_players().iter().map(|(i, _)| *i).collect();
        assert_eq!(visible, vec![1]);
        assert_eq!(state.selected_player_index(), Some(1));
    }

    #[test]
    fn holder_lookup_uses_pick_lists() {
        let mut engine = DraftEngine::new();
        engine.load_players_text("Ava, Ben").unwrap();
        engine.add_coaches_text("Ann, Bo").unwrap();
        engine.advance_turn();
        engine.toggle_assign(1).unwrap();

        let mut state = ViewState::default();
        state.snapshot = engine.state().snapshot();
        assert_eq!(state.holder_of("Ben").map(|c| c.name.as_str()), Some("Bo"));
        assert!(state.holder_of("Ava").is_none());
    }

    #[test]
    fn help_text_follows_mode() {
        let mut state = ViewState::default();
        assert!(help_text(&state).contains("Tab:Focus"));
        state.input = Some(TextInput::new(InputTarget::Players));
        assert!(help_text(&state).contains("Enter:Submit"));
        state.confirm = Some(PendingConfirm::Quit);
        assert!(help_text(&state).contains("y:Confirm"));
    }

    #[test]
    fn render_frame_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(120, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();

        state.snapshot = snapshot_with("Ava, Ben, Cy", "Ann, Bo");
        state.timer_remaining = Some(Duration::from_secs(12));
        state.notice = Some("Loaded 3 players.".into());
        state.confirm = Some(PendingConfirm::ClearPlayers);
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();

        state.show_order = true;
        state.input = Some(TextInput::new(InputTarget::Coaches));
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
    }
}
