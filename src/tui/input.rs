//! Keyboard mapping and cursor movement.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::chess::Square;
use crate::controller::UserAction;

/// What a key press asks the TUI to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    /// Forward an action to the controller.
    Action(UserAction),
    /// Move the board cursor.
    Cursor(Square),
    /// "Click" the square under the cursor.
    Activate,
    /// Leave the client.
    Quit,
    /// Nothing to do.
    None,
}

/// Moves the cursor one square with the arrow keys, stopping at the edges.
pub fn move_cursor(cursor: Square, key: KeyCode) -> Square {
    let step = match key {
        KeyCode::Up => cursor.offset(-1, 0),
        KeyCode::Down => cursor.offset(1, 0),
        KeyCode::Left => cursor.offset(0, -1),
        KeyCode::Right => cursor.offset(0, 1),
        _ => None,
    };
    step.unwrap_or(cursor)
}

/// Maps a key press to an intent.
///
/// While the new-game prompt is up, `y`/`Y` confirms and any other key
/// declines.
pub fn map_key(key: KeyEvent, cursor: Square, awaiting_confirmation: bool) -> KeyIntent {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyIntent::Quit;
    }

    if awaiting_confirmation {
        let yes = matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'));
        return KeyIntent::Action(UserAction::Confirm(yes));
    }

    match key.code {
        KeyCode::Esc => KeyIntent::Action(UserAction::ClearSelection),
        KeyCode::Char('n') | KeyCode::Char('N') => KeyIntent::Action(UserAction::NewGameShortcut),
        KeyCode::Char('r') | KeyCode::Char('R') => KeyIntent::Action(UserAction::Resync),
        KeyCode::Char('q') | KeyCode::Char('Q') => KeyIntent::Quit,
        KeyCode::Enter | KeyCode::Char(' ') => KeyIntent::Activate,
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
            KeyIntent::Cursor(move_cursor(cursor, key.code))
        }
        _ => KeyIntent::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col).unwrap()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_cursor_stops_at_edges() {
        assert_eq!(move_cursor(sq(0, 0), KeyCode::Up), sq(0, 0));
        assert_eq!(move_cursor(sq(0, 0), KeyCode::Left), sq(0, 0));
        assert_eq!(move_cursor(sq(7, 7), KeyCode::Down), sq(7, 7));
        assert_eq!(move_cursor(sq(7, 7), KeyCode::Right), sq(7, 7));
        assert_eq!(move_cursor(sq(3, 3), KeyCode::Up), sq(2, 3));
        assert_eq!(move_cursor(sq(3, 3), KeyCode::Right), sq(3, 4));
    }

    #[test]
    fn test_shortcuts() {
        let c = sq(7, 4);
        assert_eq!(
            map_key(press(KeyCode::Esc), c, false),
            KeyIntent::Action(UserAction::ClearSelection)
        );
        assert_eq!(
            map_key(press(KeyCode::Char('N')), c, false),
            KeyIntent::Action(UserAction::NewGameShortcut)
        );
        assert_eq!(map_key(press(KeyCode::Enter), c, false), KeyIntent::Activate);
        assert_eq!(map_key(press(KeyCode::Char('q')), c, false), KeyIntent::Quit);
        assert_eq!(map_key(press(KeyCode::Tab), c, false), KeyIntent::None);
    }

    #[test]
    fn test_prompt_only_accepts_y() {
        let c = sq(7, 4);
        assert_eq!(
            map_key(press(KeyCode::Char('y')), c, true),
            KeyIntent::Action(UserAction::Confirm(true))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('q')), c, true),
            KeyIntent::Action(UserAction::Confirm(false))
        );
        assert_eq!(
            map_key(press(KeyCode::Esc), c, true),
            KeyIntent::Action(UserAction::Confirm(false))
        );
    }
}
