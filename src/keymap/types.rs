//! Core types for the key codec: Key, KeyCode, Modifiers
//!
//! A [`Key`] is the canonical, hashable descriptor of one physical input
//! event. Hosts normalize their raw events into keys once (see
//! [`super::crossterm_adapter`]) and everything downstream compares keys by
//! value.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags::bitflags! {
    /// Modifier keys held during a key event
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Modifiers: u8 {
        const CTRL = 0b0001;
        const SHIFT = 0b0010;
        const ALT = 0b0100;
        /// Cmd on macOS, Win/Super elsewhere
        const META = 0b1000;
    }
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers::empty();

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.contains(Modifiers::CTRL)
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.contains(Modifiers::SHIFT)
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.contains(Modifiers::ALT)
    }

    #[inline]
    pub const fn meta(self) -> bool {
        self.contains(Modifiers::META)
    }

    /// Get the platform-specific "command" modifier (Cmd on macOS, Ctrl elsewhere)
    pub fn cmd() -> Modifiers {
        if cfg!(target_os = "macos") {
            Modifiers::META
        } else {
            Modifiers::CTRL
        }
    }

    /// Canonical lowercase names in the fixed order used by [`Key`]'s text form
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        [
            (Modifiers::CTRL, "ctrl"),
            (Modifiers::ALT, "alt"),
            (Modifiers::SHIFT, "shift"),
            (Modifiers::META, "meta"),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self.names().collect();
        write!(f, "{}", parts.join("+"))
    }
}

/// The discriminated kind of a key
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyCode {
    /// Printable character sequence, stored verbatim (case is significant)
    Rune(String),

    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Space,

    Up,
    Down,
    Left,
    Right,

    Home,
    End,
    PageUp,
    PageDown,
    Insert,

    /// F1-F24
    F(u8),
}

impl KeyCode {
    /// Canonical name of a named key, `None` for runes
    pub fn name(&self) -> Option<String> {
        let name = match self {
            KeyCode::Rune(_) => return None,
            KeyCode::Enter => "enter",
            KeyCode::Escape => "esc",
            KeyCode::Tab => "tab",
            KeyCode::Backspace => "backspace",
            KeyCode::Delete => "delete",
            KeyCode::Space => "space",
            KeyCode::Up => "up",
            KeyCode::Down => "down",
            KeyCode::Left => "left",
            KeyCode::Right => "right",
            KeyCode::Home => "home",
            KeyCode::End => "end",
            KeyCode::PageUp => "pageup",
            KeyCode::PageDown => "pagedown",
            KeyCode::Insert => "insert",
            KeyCode::F(n) => return Some(format!("f{}", n)),
        };
        Some(name.to_string())
    }

    pub fn is_rune(&self) -> bool {
        matches!(self, KeyCode::Rune(_))
    }

    /// Whether the text form of this code parses back to it
    ///
    /// False for an empty rune and for function keys outside F1-F24.
    pub fn is_valid(&self) -> bool {
        match self {
            KeyCode::Rune(text) => !text.is_empty(),
            KeyCode::F(n) => (1..=24).contains(n),
            _ => true,
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Rune(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_whitespace() => write!(f, "{}", c),
                    _ => write!(f, "rune:{}", text),
                }
            }
            named => match named.name() {
                Some(name) => write!(f, "{}", name),
                None => Ok(()),
            },
        }
    }
}

/// A single key event: a key code with modifiers
///
/// Equality is exact on every field. The `Display` form is the canonical
/// text descriptor (`ctrl+shift+up`, `j`, `ctrl++`, `rune:ab`) and
/// round-trips through [`str::parse`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    pub code: KeyCode,
    pub mods: Modifiers,
}

impl Key {
    pub const fn new(code: KeyCode, mods: Modifiers) -> Self {
        Self { code, mods }
    }

    /// Create a named key with no modifiers
    pub const fn named(code: KeyCode) -> Self {
        Self {
            code,
            mods: Modifiers::NONE,
        }
    }

    /// Create a rune key with no modifiers
    pub fn rune(text: impl Into<String>) -> Self {
        Self {
            code: KeyCode::Rune(text.into()),
            mods: Modifiers::NONE,
        }
    }

    /// Create a rune key with modifiers
    pub fn rune_with_mods(text: impl Into<String>, mods: Modifiers) -> Self {
        Self {
            code: KeyCode::Rune(text.into()),
            mods,
        }
    }

    /// Shorthand for `ctrl+<text>`
    pub fn ctrl(text: impl Into<String>) -> Self {
        Self::rune_with_mods(text, Modifiers::CTRL)
    }

    /// Display the key using platform-specific symbols, for help screens
    pub fn display_string(&self) -> String {
        let mut parts = Vec::new();

        if cfg!(target_os = "macos") {
            if self.mods.ctrl() {
                parts.push("⌃");
            }
            if self.mods.alt() {
                parts.push("⌥");
            }
            if self.mods.shift() {
                parts.push("⇧");
            }
            if self.mods.meta() {
                parts.push("⌘");
            }
        } else {
            if self.mods.ctrl() {
                parts.push("Ctrl+");
            }
            if self.mods.alt() {
                parts.push("Alt+");
            }
            if self.mods.shift() {
                parts.push("Shift+");
            }
            if self.mods.meta() {
                parts.push("Win+");
            }
        }

        let key_str = match &self.code {
            KeyCode::Rune(text) if self.mods.is_empty() => text.clone(),
            KeyCode::Rune(text) => text.to_uppercase(),
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::Left => "←".to_string(),
            KeyCode::Right => "→".to_string(),
            KeyCode::Escape => "Esc".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            named => {
                let name = named.name().unwrap_or_default();
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => name,
                }
            }
        };

        format!("{}{}", parts.join(""), key_str)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in self.mods.names() {
            write!(f, "{}+", name)?;
        }
        write!(f, "{}", self.code)
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
