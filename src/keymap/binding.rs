//! Binding: the (Key, Action) pair stored in the registry

use std::fmt;

use super::action::Action;
use super::types::Key;

/// A key bound to an action, scoped by the action's context and mode
pub struct Binding<E> {
    pub key: Key,
    pub action: Action<E>,
}

// Manual impls: the effect type itself need not be Clone/Debug/PartialEq.
impl<E> Clone for Binding<E> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            action: self.action.clone(),
        }
    }
}

impl<E> fmt::Debug for Binding<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key.to_string())
            .field("action", &self.action)
            .finish()
    }
}

impl<E> PartialEq for Binding<E> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.action == other.action
    }
}

impl<E> Binding<E> {
    pub fn new(key: Key, action: Action<E>) -> Self {
        Self { key, action }
    }

    pub fn action_id(&self) -> &str {
        &self.action.id
    }

    pub fn context(&self) -> &str {
        &self.action.context
    }

    pub fn mode(&self) -> Option<&str> {
        self.action.mode.as_deref()
    }

    /// True if this binding occupies exactly the given (key, context, mode) slot
    pub fn occupies(&self, key: &Key, context: &str, mode: Option<&str>) -> bool {
        self.key == *key && self.context() == context && self.mode() == mode
    }

    /// Get display string for this binding's key
    pub fn display_string(&self) -> String {
        self.key.display_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_accessors() {
        let binding = Binding::new(
            Key::rune("j"),
            Action::new("move-down")
                .context("workspace")
                .mode("normal")
                .handler(|| ()),
        );

        assert_eq!(binding.action_id(), "move-down");
        assert_eq!(binding.context(), "workspace");
        assert_eq!(binding.mode(), Some("normal"));
    }

    #[test]
    fn test_occupies_exact_slot() {
        let binding = Binding::new(Key::ctrl("c"), Action::new("quit").handler(|| ()));

        assert!(binding.occupies(&Key::ctrl("c"), "global", None));
        assert!(!binding.occupies(&Key::ctrl("c"), "global", Some("normal")));
        assert!(!binding.occupies(&Key::ctrl("c"), "modal", None));
        assert!(!binding.occupies(&Key::rune("c"), "global", None));
    }
}
