//! Fixed key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use wpdb_core::command::{DebuggerCommand, KeyChord};

use crate::features::input::EditAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Command(DebuggerCommand),
    Send,
    HistoryOlder,
    HistoryNewer,
    ToggleHelp,
    CloseOverlay,
    ConsolePageUp,
    ConsolePageDown,
    ConsoleFollow,
    Edit(EditAction),
}

/// Maps a key press to an action. Key releases map to nothing.
pub fn action_for(key: &KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Char('c' | 'q') if ctrl => Some(Action::Quit),
        KeyCode::Char('u') if ctrl => Some(Action::Edit(EditAction::Clear)),
        KeyCode::Char('a') if ctrl => Some(Action::Edit(EditAction::Home)),
        KeyCode::Char('e') if ctrl => Some(Action::Edit(EditAction::End)),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(Action::Edit(EditAction::Insert(c))),
        KeyCode::F(1) => Some(Action::ToggleHelp),
        // Some terminals report Shift+F11 as F23.
        KeyCode::F(23) => KeyChord::function(11).with_shift().command().map(Action::Command),
        KeyCode::F(n) => {
            let chord = KeyChord { function: n, shift };
            chord.command().map(Action::Command)
        }
        KeyCode::Enter => Some(Action::Send),
        KeyCode::Up => Some(Action::HistoryOlder),
        KeyCode::Down => Some(Action::HistoryNewer),
        KeyCode::PageUp => Some(Action::ConsolePageUp),
        KeyCode::PageDown => Some(Action::ConsolePageDown),
        KeyCode::End if ctrl => Some(Action::ConsoleFollow),
        KeyCode::End if key.modifiers.is_empty() => Some(Action::Edit(EditAction::End)),
        KeyCode::Esc => Some(Action::CloseOverlay),
        KeyCode::Backspace => Some(Action::Edit(EditAction::Backspace)),
        KeyCode::Delete => Some(Action::Edit(EditAction::Delete)),
        KeyCode::Left => Some(Action::Edit(EditAction::Left)),
        KeyCode::Right => Some(Action::Edit(EditAction::Right)),
        KeyCode::Home => Some(Action::Edit(EditAction::Home)),
        _ => None,
    }
}
