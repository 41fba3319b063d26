// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (cursor movement,
// focus, text entry, confirmation prompts).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{Focus, InputTarget, PendingConfirm, TextInput, ViewState};
use crate::protocol::UserCommand;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator. Returns `None` when the key press was handled locally by
/// mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm.is_some() {
        return handle_confirm(key_event, view_state);
    }

    if view_state.input.is_some() {
        return handle_text_entry(key_event, view_state);
    }

    if view_state.show_order {
        if let Some(handled) = handle_order_preview(key_event, view_state) {
            return handled;
        }
    }

    match key_event.code {
        // Cursor movement
        KeyCode::Up | KeyCode::Char('k') => {
            move_cursor(view_state, -1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_cursor(view_state, 1);
            None
        }
        KeyCode::Tab => {
            view_state.focus = match view_state.focus {
                Focus::Players => Focus::Coaches,
                Focus::Coaches => Focus::Players,
            };
            None
        }

        // Picks and turn order
        KeyCode::Enter | KeyCode::Char(' ') => match view_state.focus {
            Focus::Players => view_state
                .selected_player_index()
                .map(UserCommand::ToggleAssign),
            Focus::Coaches => {
                if view_state.snapshot.coaches.is_empty() {
                    None
                } else {
                    Some(UserCommand::SelectCoach(view_state.selected_coach))
                }
            }
        },
        KeyCode::Char('n') => Some(UserCommand::NextCoach),
        KeyCode::Char('u') => unassign_selected(view_state),
        KeyCode::Char('A') => Some(UserCommand::AutoAssign),

        // Availability
        KeyCode::Char('a') => {
            let index = view_state.selected_player_index()?;
            let available = view_state.snapshot.players.get(index)?.available;
            Some(UserCommand::SetAvailability {
                player_index: index,
                available: !available,
            })
        }
        KeyCode::Char('m') => Some(UserCommand::MarkAll { available: true }),
        KeyCode::Char('M') => Some(UserCommand::MarkAll { available: false }),
        KeyCode::Char('f') => {
            view_state.available_only = !view_state.available_only;
            view_state.clamp_selection();
            None
        }

        // Roster entry
        KeyCode::Char('l') => {
            view_state.input = Some(TextInput::new(InputTarget::Players));
            None
        }
        KeyCode::Char('c') => {
            view_state.input = Some(TextInput::new(InputTarget::Coaches));
            None
        }

        // Destructive actions ask first
        KeyCode::Char('x') => {
            if let Some(coach) = view_state.selected_coach_row() {
                view_state.confirm = Some(PendingConfirm::RemoveCoach {
                    id: coach.id,
                    name: coach.name.clone(),
                });
            }
            None
        }
        KeyCode::Char('X') => {
            view_state.confirm = Some(PendingConfirm::ClearPlayers);
            None
        }
        KeyCode::Char('C') => {
            view_state.confirm = Some(PendingConfirm::ClearCoaches);
            None
        }

        // Preview and export
        KeyCode::Char('o') => Some(UserCommand::PreviewOrder),
        KeyCode::Char('e') => Some(UserCommand::ExportAvailable),
        KeyCode::Char('E') => Some(UserCommand::ExportBoard),

        KeyCode::Char('q') => {
            view_state.confirm = Some(PendingConfirm::Quit);
            None
        }

        _ => None,
    }
}

/// Handle key events while a confirmation prompt is open.
///
/// `y` sends the pending command, `n` or `Esc` drops it, everything else is
/// blocked.
fn handle_confirm(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            view_state.confirm.take().map(PendingConfirm::into_command)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm = None;
            None
        }
        _ => None,
    }
}

/// Handle key events while the text entry box is open.
fn handle_text_entry(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.input = None;
            None
        }
        KeyCode::Enter => view_state.input.take().map(TextInput::into_command),
        KeyCode::Backspace => {
            if let Some(input) = view_state.input.as_mut() {
                input.buffer.pop();
            }
            None
        }
        KeyCode::Tab => {
            if let Some(input) = view_state.input.as_mut() {
                input.buffer.push('\t');
            }
            None
        }
        KeyCode::Char(c) => {
            if let Some(input) = view_state.input.as_mut() {
                input.buffer.push(c);
            }
            None
        }
        _ => None,
    }
}

/// Keys that only mean something while the order preview is showing.
/// Returns `None` to fall through to normal handling.
fn handle_order_preview(
    key_event: KeyEvent,
    view_state: &mut ViewState,
) -> Option<Option<UserCommand>> {
    match key_event.code {
        KeyCode::Esc | KeyCode::Char('o') => {
            view_state.show_order = false;
            Some(None)
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.order_scroll = view_state.order_scroll.saturating_sub(1);
            Some(None)
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let last = view_state.draft_order.len().saturating_sub(1);
            view_state.order_scroll = (view_state.order_scroll + 1).min(last);
            Some(None)
        }
        _ => None,
    }
}

fn move_cursor(view_state: &mut ViewState, delta: isize) {
    let (cursor, len) = match view_state.focus {
        Focus::Players => (
            &mut view_state.selected_player,
            view_state.snapshot.players.len(),
        ),
        Focus::Coaches => (
            &mut view_state.selected_coach,
            view_state.snapshot.coaches.len(),
        ),
    };
    *cursor = cursor.saturating_add_signed(delta).min(len.saturating_sub(1));
    view_state.clamp_selection();
}

/// Return the player under the cursor to the pool, whoever holds them.
fn unassign_selected(view_state: &ViewState) -> Option<UserCommand> {
    let player = view_state.selected_player_row()?;
    let coach = view_state.holder_of(&player.name)?;
    Some(UserCommand::Unassign {
        coach: coach.id,
        player: player.name.clone(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::UiUpdate;
    use crate::tui::apply_ui_update;
    use crate::tui::tests::snapshot_with;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn typed(state: &mut ViewState, text: &str) {
        for c in text.chars() {
            assert!(handle_key(key(KeyCode::Char(c)), state).is_none());
        }
    }

    fn board(players: &str, coaches: &str) -> ViewState {
        let mut state = ViewState::default();
        apply_ui_update(
            &mut state,
            UiUpdate::Snapshot(Box::new(snapshot_with(players, coaches))),
        );
        state
    }

    // -- Global keys --

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let mut state = ViewState::default();
        state.input = Some(TextInput::new(InputTarget::Players));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(ctrl_c, &mut state), Some(UserCommand::Quit));
    }

    #[test]
    fn release_events_are_ignored() {
        let mut state = board("Ava", "Ann");
        let release = KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(handle_key(release, &mut state).is_none());
    }

    // -- Confirmation --

    #[test]
    fn q_asks_before_quitting() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Char('q')), &mut state).is_none());
        assert_eq!(state.confirm, Some(PendingConfirm::Quit));

        // Other keys are blocked while the prompt is open
        assert!(handle_key(key(KeyCode::Char('e')), &mut state).is_none());
        assert_eq!(
            handle_key(key(KeyCode::Char('y')), &mut state),
            Some(UserCommand::Quit)
        );
        assert!(state.confirm.is_none());
    }

    #[test]
    fn clearing_players_can_be_cancelled() {
        let mut state = board("Ava", "");
        handle_key(key(KeyCode::Char('X')), &mut state);
        assert_eq!(state.confirm, Some(PendingConfirm::ClearPlayers));
        assert!(handle_key(key(KeyCode::Esc), &mut state).is_none());
        assert!(state.confirm.is_none());
    }

    #[test]
    fn clearing_coaches_after_confirm() {
        let mut state = board("Ava", "Ann");
        handle_key(key(KeyCode::Char('C')), &mut state);
        assert_eq!(
            handle_key(key(KeyCode::Char('y')), &mut state),
            Some(UserCommand::ClearCoaches)
        );
    }

    #[test]
    fn remove_coach_targets_selected_card() {
        let mut state = board("Ava", "Ann, Bo");
        state.focus = Focus::Coaches;
        handle_key(key(KeyCode::Down), &mut state);
        handle_key(key(KeyCode::Char('x')), &mut state);

        let bo = state.snapshot.coaches[1].id;
        assert_eq!(
            state.confirm,
            Some(PendingConfirm::RemoveCoach {
                id: bo,
                name: "Bo".into()
            })
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('y')), &mut state),
            Some(UserCommand::RemoveCoach(bo))
        );
    }

    #[test]
    fn remove_with_no_coaches_does_nothing() {
        let mut state = board("Ava", "");
        handle_key(key(KeyCode::Char('x')), &mut state);
        assert!(state.confirm.is_none());
    }

    // -- Text entry --

    #[test]
    fn player_entry_submits_load() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('l')), &mut state);
        typed(&mut state, "Ava, Bem");
        handle_key(key(KeyCode::Backspace), &mut state);
        typed(&mut state, "n");
        handle_key(key(KeyCode::Tab), &mut state);
        typed(&mut state, "Cy");

        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::LoadPlayers("Ava, Ben\tCy".into()))
        );
        assert!(state.input.is_none());
    }

    #[test]
    fn coach_entry_allows_blank_submit() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('c')), &mut state);
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::AddCoaches(String::new()))
        );
    }

    #[test]
    fn entry_keys_do_not_trigger_shortcuts() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('c')), &mut state);
        typed(&mut state, "qeA");
        assert!(state.confirm.is_none());
        assert_eq!(state.input.as_ref().map(|i| i.buffer.as_str()), Some("qeA"));

        assert!(handle_key(key(KeyCode::Esc), &mut state).is_none());
        assert!(state.input.is_none());
    }

    // -- Picks --

    #[test]
    fn enter_toggles_selected_player() {
        let mut state = board("Ava, Ben, Cy", "Ann");
        handle_key(key(KeyCode::Char('j')), &mut state);
        handle_key(key(KeyCode::Char('j')), &mut state);
        handle_key(key(KeyCode::Char('j')), &mut state);
        assert_eq!(state.selected_player, 2);
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::ToggleAssign(2))
        );
    }

    #[test]
    fn enter_on_empty_roster_sends_nothing() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Enter), &mut state).is_none());
    }

    #[test]
    fn enter_on_coach_puts_them_on_the_clock() {
        let mut state = board("Ava", "Ann, Bo, Cat");
        handle_key(key(KeyCode::Tab), &mut state);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.selected_player, 0);
        assert_eq!(
            handle_key(key(KeyCode::Char(' ')), &mut state),
            Some(UserCommand::SelectCoach(1))
        );
    }

    #[test]
    fn toggle_uses_roster_index_when_filtered() {
        let mut engine = draftboard_core::draft::DraftEngine::new();
        engine.load_players_text("Ava, Ben, Cy").unwrap();
        engine.add_coach(None);
        engine.set_availability(2, true);

        let mut state = ViewState::default();
        state.snapshot = engine.state().snapshot();
        handle_key(key(KeyCode::Char('f')), &mut state);
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::ToggleAssign(2))
        );
    }

    #[test]
    fn unassign_finds_holder() {
        let mut engine = draftboard_core::draft::DraftEngine::new();
        engine.load_players_text("Ava, Ben").unwrap();
        engine.add_coaches_text("Ann, Bo").unwrap();
        engine.select_coach(1);
        engine.toggle_assign(0).unwrap();

        let mut state = ViewState::default();
        state.snapshot = engine.state().snapshot();
        let bo = state.snapshot.coaches[1].id;
        assert_eq!(
            handle_key(key(KeyCode::Char('u')), &mut state),
            Some(UserCommand::Unassign {
                coach: bo,
                player: "Ava".into()
            })
        );

        // Nobody holds Ben
        handle_key(key(KeyCode::Down), &mut state);
        assert!(handle_key(key(KeyCode::Char('u')), &mut state).is_none());
    }

    #[test]
    fn availability_key_flips_flag() {
        let mut state = board("Ava", "");
        assert_eq!(
            handle_key(key(KeyCode::Char('a')), &mut state),
            Some(UserCommand::SetAvailability {
                player_index: 0,
                available: true
            })
        );
    }

    #[test]
    fn simple_command_keys() {
        let mut state = ViewState::default();
        let cases = [
            ('n', UserCommand::NextCoach),
            ('A', UserCommand::AutoAssign),
            ('m', UserCommand::MarkAll { available: true }),
            ('M', UserCommand::MarkAll { available: false }),
            ('o', UserCommand::PreviewOrder),
            ('e', UserCommand::ExportAvailable),
            ('E', UserCommand::ExportBoard),
        ];
        for (c, expected) in cases {
            assert_eq!(
                handle_key(key(KeyCode::Char(c)), &mut state),
                Some(expected),
                "key {c}"
            );
        }
    }

    // -- Order preview --

    #[test]
    fn order_preview_scrolls_and_closes() {
        let mut state = board("P1, P2, P3", "A");
        state.draft_order = draftboard_core::snake::snake_order(&["P1", "P2", "P3"], &["A"]).unwrap();
        state.show_order = true;

        handle_key(key(KeyCode::Down), &mut state);
        handle_key(key(KeyCode::Down), &mut state);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.order_scroll, 2);
        assert_eq!(state.selected_player, 0);

        // Command keys still work while previewing
        assert_eq!(
            handle_key(key(KeyCode::Char('n')), &mut state),
            Some(UserCommand::NextCoach)
        );

        handle_key(key(KeyCode::Esc), &mut state);
        assert!(!state.show_order);
    }
}
