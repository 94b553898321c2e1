use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Normalized keystroke consumed by the session engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Character(char),
    Backspace,
    /// Enter; typed as a space so it still matches word gaps
    NewSegment,
}

impl InputEvent {
    /// Character this event contributes to typed text, if any
    pub fn as_char(&self) -> Option<char> {
        match self {
            InputEvent::Character(c) => Some(*c),
            InputEvent::NewSegment => Some(' '),
            InputEvent::Backspace => None,
        }
    }
}

fn is_chord(modifiers: KeyModifiers) -> bool {
    modifiers.intersects(
        KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER | KeyModifiers::META,
    )
}

/// Map a terminal key event to an input event.
///
/// Modifier chords and non-text keys (arrows, function keys, ...) yield `None`.
/// Shift is not a chord.
pub fn normalize_key(key: &KeyEvent) -> Option<InputEvent> {
    if is_chord(key.modifiers) {
        return None;
    }
    match key.code {
        KeyCode::Backspace => Some(InputEvent::Backspace),
        KeyCode::Enter => Some(InputEvent::NewSegment),
        KeyCode::Char(c) if !c.is_control() => Some(InputEvent::Character(c)),
        _ => None,
    }
}

/// Apply an event to the typed buffer. Backspace on an empty buffer is a no-op.
pub fn apply_input(typed: &mut Vec<char>, event: InputEvent) {
    match event.as_char() {
        Some(c) => typed.push(c),
        None => {
            typed.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_plain_characters() {
        assert_eq!(
            normalize_key(&key(KeyCode::Char('a'), KeyModifiers::NONE)),
            Some(InputEvent::Character('a'))
        );
        assert_eq!(
            normalize_key(&key(KeyCode::Char(' '), KeyModifiers::NONE)),
            Some(InputEvent::Character(' '))
        );
    }

    #[test]
    fn test_shift_is_not_a_chord() {
        assert_eq!(
            normalize_key(&key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(InputEvent::Character('A'))
        );
    }

    #[test]
    fn test_chords_are_ignored() {
        for m in [
            KeyModifiers::CONTROL,
            KeyModifiers::ALT,
            KeyModifiers::SUPER,
            KeyModifiers::META,
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        ] {
            assert_eq!(normalize_key(&key(KeyCode::Char('r'), m)), None);
        }
        assert_eq!(
            normalize_key(&key(KeyCode::Backspace, KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn test_enter_and_backspace() {
        assert_eq!(
            normalize_key(&key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(InputEvent::NewSegment)
        );
        assert_eq!(
            normalize_key(&key(KeyCode::Backspace, KeyModifiers::NONE)),
            Some(InputEvent::Backspace)
        );
    }

    #[test]
    fn test_other_keys_ignored() {
        for code in [KeyCode::Left, KeyCode::Up, KeyCode::Tab, KeyCode::F(5), KeyCode::Esc] {
            assert_eq!(normalize_key(&key(code, KeyModifiers::NONE)), None);
        }
    }

    #[test]
    fn test_apply_input() {
        let mut typed = Vec::new();
        apply_input(&mut typed, InputEvent::Backspace);
        assert!(typed.is_empty());

        apply_input(&mut typed, InputEvent::Character('h'));
        apply_input(&mut typed, InputEvent::NewSegment);
        assert_eq!(typed, vec!['h', ' ']);

        apply_input(&mut typed, InputEvent::Backspace);
        assert_eq!(typed, vec!['h']);
    }
}
