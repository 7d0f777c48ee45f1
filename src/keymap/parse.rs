//! Parsing of the canonical key text form
//!
//! Accepts the canonical form produced by `Key`'s `Display` plus the usual
//! aliases (`control`, `option`, `cmd`, `return`, `pgdn`, ...), so hand-written
//! keymap files can be loosely typed and still normalize on the next export.

use std::str::FromStr;

use super::error::KeymapError;
use super::types::{Key, KeyCode, Modifiers};

const RUNE_PREFIX: &str = "rune:";

impl FromStr for Key {
    type Err = KeymapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key(s)
    }
}

/// Parse a key string like "ctrl+shift+s" into a Key
///
/// Modifiers are consumed from the left while each `+`-separated segment
/// names one; whatever remains is the key itself. That keeps `ctrl++` and
/// `rune:a+b` unambiguous.
pub fn parse_key(key_str: &str) -> Result<Key, KeymapError> {
    if key_str.is_empty() {
        return Err(KeymapError::InvalidKey("empty key".to_string()));
    }

    let mut mods = Modifiers::NONE;
    let mut rest = key_str;

    while let Some(idx) = rest.find('+') {
        if idx == 0 {
            break;
        }
        match parse_modifier(&rest[..idx]) {
            Some(m) => {
                mods |= m;
                rest = &rest[idx + 1..];
            }
            None => break,
        }
    }

    if rest.is_empty() {
        return Err(KeymapError::InvalidKey(format!(
            "No key found in binding: {}",
            key_str
        )));
    }

    let code = parse_key_code(rest).map_err(|_| {
        KeymapError::InvalidKey(format!("Unknown key '{}' in binding: {}", rest, key_str))
    })?;
    Ok(Key::new(code, mods))
}

fn parse_modifier(part: &str) -> Option<Modifiers> {
    match part.to_lowercase().as_str() {
        "cmd" => Some(Modifiers::cmd()),
        "ctrl" | "control" => Some(Modifiers::CTRL),
        "shift" => Some(Modifiers::SHIFT),
        "alt" | "option" | "opt" => Some(Modifiers::ALT),
        "meta" | "super" | "win" => Some(Modifiers::META),
        _ => None,
    }
}

/// Parse a key code from string
fn parse_key_code(key: &str) -> Result<KeyCode, KeymapError> {
    if let Some(text) = key.strip_prefix(RUNE_PREFIX) {
        if text.is_empty() {
            return Err(KeymapError::InvalidKey(key.to_string()));
        }
        return Ok(KeyCode::Rune(text.to_string()));
    }

    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Rune(c.to_string()));
    }

    let lower = key.to_lowercase();
    let code = match lower.as_str() {
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Escape,
        "tab" => KeyCode::Tab,
        "backspace" | "back" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "space" => KeyCode::Space,

        "up" | "arrowup" => KeyCode::Up,
        "down" | "arrowdown" => KeyCode::Down,
        "left" | "arrowleft" => KeyCode::Left,
        "right" | "arrowright" => KeyCode::Right,

        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdown" | "pgdn" => KeyCode::PageDown,
        "insert" | "ins" => KeyCode::Insert,

        other => match other.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            Some(n) if (1..=24).contains(&n) => KeyCode::F(n),
            _ => return Err(KeymapError::InvalidKey(key.to_string())),
        },
    };
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let key = parse_key("a").unwrap();
        assert_eq!(key.code, KeyCode::Rune("a".to_string()));
        assert!(key.mods.is_empty());
    }

    #[test]
    fn test_parse_key_with_multiple_modifiers() {
        let key = parse_key("ctrl+shift+s").unwrap();
        assert_eq!(key.code, KeyCode::Rune("s".to_string()));
        assert!(key.mods.ctrl());
        assert!(key.mods.shift());
    }

    #[test]
    fn test_parse_modifier_aliases_case_insensitive() {
        let key = parse_key("Control+Option+Left").unwrap();
        assert_eq!(key, Key::new(KeyCode::Left, Modifiers::CTRL | Modifiers::ALT));
    }

    #[test]
    fn test_parse_cmd_modifier() {
        let key = parse_key("cmd+s").unwrap();
        assert_eq!(key.mods, Modifiers::cmd());
    }

    #[test]
    fn test_parse_named_keys() {
        assert_eq!(parse_key("enter").unwrap().code, KeyCode::Enter);
        assert_eq!(parse_key("Escape").unwrap().code, KeyCode::Escape);
        assert_eq!(parse_key("pgdn").unwrap().code, KeyCode::PageDown);
        assert_eq!(parse_key("f12").unwrap().code, KeyCode::F(12));
    }

    #[test]
    fn test_parse_preserves_rune_case() {
        assert_eq!(parse_key("G").unwrap(), Key::rune("G"));
        assert_eq!(parse_key("F").unwrap(), Key::rune("F"));
    }

    #[test]
    fn test_parse_plus_rune() {
        assert_eq!(parse_key("+").unwrap(), Key::rune("+"));
        assert_eq!(parse_key("ctrl++").unwrap(), Key::ctrl("+"));
    }

    #[test]
    fn test_parse_rune_prefix_keeps_plus() {
        assert_eq!(
            parse_key("alt+rune:a+b").unwrap(),
            Key::rune_with_mods("a+b", Modifiers::ALT)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_key("").is_err());
        assert!(parse_key("ctrl+").is_err());
        assert!(parse_key("ctrl+x+y").is_err());
        assert!(parse_key("hyperdrive").is_err());
        assert!(parse_key("f25").is_err());
        assert!(parse_key("rune:").is_err());
    }

    #[test]
    fn test_canonical_form_is_fixed_point() {
        for text in [
            "ctrl+c",
            "j",
            "J",
            "alt+shift+up",
            "ctrl++",
            "rune:ab",
            "rune: ",
            "meta+f7",
            "esc",
            "shift+tab",
        ] {
            let key: Key = text.parse().unwrap();
            assert_eq!(key.to_string(), text);
        }
    }

    #[test]
    fn test_aliases_normalize() {
        let key: Key = "Shift+Control+Return".parse().unwrap();
        assert_eq!(key.to_string(), "ctrl+shift+enter");
    }
}
