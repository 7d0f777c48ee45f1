//! Adapter to convert crossterm key events to our Key type

use crossterm::event::{KeyCode as CtKeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::types::{Key, KeyCode, Modifiers};

/// Convert a crossterm key event to a Key
///
/// Returns None for key releases and for keys with no binding name
/// (media keys, lone modifiers, caps lock, ...).
pub fn key_from_crossterm(event: KeyEvent) -> Option<Key> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let mut mods = modifiers_from_crossterm(event.modifiers);

    let code = match event.code {
        // The character already carries its case
        CtKeyCode::Char(' ') => KeyCode::Space,
        CtKeyCode::Char(c) => {
            mods.remove(Modifiers::SHIFT);
            KeyCode::Rune(c.to_string())
        }

        CtKeyCode::Enter => KeyCode::Enter,
        CtKeyCode::Esc => KeyCode::Escape,
        CtKeyCode::Tab => KeyCode::Tab,
        CtKeyCode::BackTab => {
            mods.insert(Modifiers::SHIFT);
            KeyCode::Tab
        }
        CtKeyCode::Backspace => KeyCode::Backspace,
        CtKeyCode::Delete => KeyCode::Delete,
        CtKeyCode::Insert => KeyCode::Insert,

        // Arrows
        CtKeyCode::Up => KeyCode::Up,
        CtKeyCode::Down => KeyCode::Down,
        CtKeyCode::Left => KeyCode::Left,
        CtKeyCode::Right => KeyCode::Right,

        // Navigation
        CtKeyCode::Home => KeyCode::Home,
        CtKeyCode::End => KeyCode::End,
        CtKeyCode::PageUp => KeyCode::PageUp,
        CtKeyCode::PageDown => KeyCode::PageDown,

        CtKeyCode::F(n) if (1..=24).contains(&n) => KeyCode::F(n),

        _ => return None,
    };

    Some(Key::new(code, mods))
}

fn modifiers_from_crossterm(mods: KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if mods.contains(KeyModifiers::CONTROL) {
        out |= Modifiers::CTRL;
    }
    if mods.contains(KeyModifiers::ALT) {
        out |= Modifiers::ALT;
    }
    if mods.contains(KeyModifiers::SHIFT) {
        out |= Modifiers::SHIFT;
    }
    if mods.intersects(KeyModifiers::SUPER | KeyModifiers::META) {
        out |= Modifiers::META;
    }
    out
}
