//! Key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What the player asked for with a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// "Yes, it is."
    Yes,
    /// "No, it isn't."
    No,
    /// Start, reveal or play again, depending on the screen.
    Confirm,
    /// Select the previous range.
    PrevMode,
    /// Select the next range.
    NextMode,
    /// Select a range by zero-based index.
    SelectMode(usize),
    /// Scroll the card up one row.
    ScrollUp,
    /// Scroll the card down one row.
    ScrollDown,
    /// Leave the game.
    Quit,
}

/// Maps a key event to an action. Releases and repeats are ignored.
pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::Yes),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(Action::No),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Confirm),
        KeyCode::Up | KeyCode::PageUp => Some(Action::ScrollUp),
        KeyCode::Down | KeyCode::PageDown => Some(Action::ScrollDown),
        KeyCode::Left | KeyCode::BackTab => Some(Action::PrevMode),
        KeyCode::Right | KeyCode::Tab => Some(Action::NextMode),
        KeyCode::Char(c @ '1'..='9') => c
            .to_digit(10)
            .map(|d| Action::SelectMode(d as usize - 1)),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_answer_keys() {
        assert_eq!(action_for(press(KeyCode::Char('y'))), Some(Action::Yes));
        assert_eq!(action_for(press(KeyCode::Char('N'))), Some(Action::No));
    }

    #[test]
    fn test_digits_select_modes() {
        assert_eq!(action_for(press(KeyCode::Char('1'))), Some(Action::SelectMode(0)));
        assert_eq!(action_for(press(KeyCode::Char('3'))), Some(Action::SelectMode(2)));
        assert_eq!(action_for(press(KeyCode::Char('0'))), None);
    }

    #[test]
    fn test_scroll_keys() {
        assert_eq!(action_for(press(KeyCode::Up)), Some(Action::ScrollUp));
        assert_eq!(action_for(press(KeyCode::PageDown)), Some(Action::ScrollDown));
    }

    #[test]
    fn test_ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for(key), Some(Action::Quit));
    }

    #[test]
    fn test_release_ignored() {
        let mut key = press(KeyCode::Enter);
        key.kind = KeyEventKind::Release;
        assert_eq!(action_for(key), None);
    }
}
