//! Actions: named, described units of behavior that keys are bound to
//!
//! An action's handler produces an effect of a caller-chosen type `E`. The
//! effect is opaque here; it is handed back to the host event loop untouched.

use std::fmt;
use std::sync::Arc;

use super::context::GLOBAL;

/// Single-method capability producing a follow-up effect
pub trait Handler<E>: Send + Sync {
    fn invoke(&self) -> E;
}

impl<E, F> Handler<E> for F
where
    F: Fn() -> E + Send + Sync,
{
    fn invoke(&self) -> E {
        self()
    }
}

/// A named unit of behavior, scoped to a context and optionally a mode
///
/// Identity is the `id` field. Cloning is cheap: the handler is shared.
pub struct Action<E> {
    pub id: String,
    pub description: String,
    pub category: String,
    /// Context this action is bound in (defaults to `"global"`)
    pub context: String,
    /// Mode restriction; `None` applies in every mode
    pub mode: Option<String>,
    /// Tie-break between bindings of equal specificity; higher wins
    pub priority: i32,
    handler: Option<Arc<dyn Handler<E>>>,
}

impl<E> Action<E> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            category: String::new(),
            context: GLOBAL.to_string(),
            mode: None,
            priority: 0,
            handler: None,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Restrict the action to one mode. An empty name means "any mode".
    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = normalize_mode(mode.into());
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn handler<H>(mut self, handler: H) -> Self
    where
        H: Handler<E> + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Run the handler, producing the effect for the host event loop
    pub fn invoke(&self) -> Option<E> {
        self.handler.as_ref().map(|h| h.invoke())
    }

    /// The mode as a plain string, empty for the wildcard
    pub fn mode_str(&self) -> &str {
        self.mode.as_deref().unwrap_or("")
    }

    /// Same action (same ID and handler) scoped to a different context and mode
    pub fn rescoped(&self, context: impl Into<String>, mode: Option<String>) -> Self {
        Self {
            context: context.into(),
            mode: mode.and_then(normalize_mode),
            ..self.clone()
        }
    }
}

pub(crate) fn normalize_mode(mode: String) -> Option<String> {
    if mode.is_empty() {
        None
    } else {
        Some(mode)
    }
}

impl<E> Clone for Action<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            context: self.context.clone(),
            mode: self.mode.clone(),
            priority: self.priority,
            handler: self.handler.clone(),
        }
    }
}

impl<E> fmt::Debug for Action<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("id", &self.id)
            .field("context", &self.context)
            .field("mode", &self.mode)
            .field("priority", &self.priority)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

/// Actions compare by value fields; handlers are compared by identity
impl<E> PartialEq for Action<E> {
    fn eq(&self, other: &Self) -> bool {
        let same_handler = match (&self.handler, &other.handler) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        self.id == other.id
            && self.description == other.description
            && self.category == other.category
            && self.context == other.context
            && self.mode == other.mode
            && self.priority == other.priority
            && same_handler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let action: Action<()> = Action::new("quit");
        assert_eq!(action.context, "global");
        assert_eq!(action.mode, None);
        assert_eq!(action.priority, 0);
        assert!(!action.has_handler());
        assert_eq!(action.invoke(), None);
    }

    #[test]
    fn test_empty_mode_is_wildcard() {
        let action: Action<()> = Action::new("x").mode("");
        assert_eq!(action.mode, None);
        assert_eq!(action.mode_str(), "");

        let action: Action<()> = Action::new("x").mode("normal");
        assert_eq!(action.mode.as_deref(), Some("normal"));
    }

    #[test]
    fn test_invoke_returns_effect() {
        let action = Action::new("count").handler(|| 42);
        assert_eq!(action.invoke(), Some(42));
    }

    #[test]
    fn test_rescoped_shares_handler() {
        let action = Action::new("close")
            .describe("Close")
            .context("modal")
            .handler(|| "closed");
        let moved = action.rescoped("palette", Some("insert".to_string()));

        assert_eq!(moved.id, "close");
        assert_eq!(moved.context, "palette");
        assert_eq!(moved.mode.as_deref(), Some("insert"));
        assert_eq!(moved.invoke(), Some("closed"));
        assert_ne!(moved, action);
        assert_eq!(moved.rescoped("modal", None), action);
    }
}
