use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A raw key reduced to the edits the typed buffer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Delete,
    Ignored,
}

impl From<KeyEvent> for KeyInput {
    fn from(key: KeyEvent) -> Self {
        if key.kind == KeyEventKind::Release {
            return KeyInput::Ignored;
        }

        match key.code {
            KeyCode::Backspace => KeyInput::Delete,
            KeyCode::Char(_)
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                KeyInput::Ignored
            }
            KeyCode::Char(c) if !c.is_control() => KeyInput::Char(c),
            _ => KeyInput::Ignored,
        }
    }
}

/// Apply one key to the typed buffer. Returns whether the buffer changed.
pub fn apply(typed: &mut String, input: KeyInput) -> bool {
    match input {
        KeyInput::Char(c) => {
            typed.push(c);
            true
        }
        KeyInput::Delete => typed.pop().is_some(),
        KeyInput::Ignored => false,
    }
}
