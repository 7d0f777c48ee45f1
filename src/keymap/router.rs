//! Router: resolve a key to the single action that should fire right now
//!
//! The registry holds what is bound; the router holds what is reachable.
//! Contexts are walked from the top of the active stack down, then global,
//! and the first hit wins. There is no merging across contexts.

use std::sync::Arc;

use super::action::Action;
use super::context::ContextStack;
use super::shared::SharedRegistry;
use super::types::Key;

/// The host's modal-editing state machine, queried for its current mode
pub trait ModeSource {
    /// Current mode name; empty when the host reports no mode
    fn current_mode(&self) -> &str;
}

impl ModeSource for str {
    fn current_mode(&self) -> &str {
        self
    }
}

impl ModeSource for String {
    fn current_mode(&self) -> &str {
        self
    }
}

/// Outcome of dispatching a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch<E> {
    /// An action fired and produced this effect
    Execute { action_id: String, effect: E },
    /// Nothing claims the key; the host falls back to its default behavior
    Unhandled,
}

impl<E> Dispatch<E> {
    pub fn is_handled(&self) -> bool {
        matches!(self, Dispatch::Execute { .. })
    }

    pub fn effect(self) -> Option<E> {
        match self {
            Dispatch::Execute { effect, .. } => Some(effect),
            Dispatch::Unhandled => None,
        }
    }
}

pub struct Router<E> {
    registry: Arc<SharedRegistry<E>>,
    stack: ContextStack,
}

impl<E> Router<E> {
    pub fn new(registry: Arc<SharedRegistry<E>>) -> Self {
        Self {
            registry,
            stack: ContextStack::new(),
        }
    }

    pub fn with_stack(registry: Arc<SharedRegistry<E>>, stack: ContextStack) -> Self {
        Self { registry, stack }
    }

    pub fn registry(&self) -> &Arc<SharedRegistry<E>> {
        &self.registry
    }

    pub fn push_context(&mut self, context: impl Into<String>) {
        let context = context.into();
        tracing::trace!(target: "keyroute::router", "push context {}", context);
        self.stack.push(context);
    }

    pub fn pop_context(&mut self) -> Option<String> {
        let popped = self.stack.pop();
        tracing::trace!(target: "keyroute::router", "pop context {:?}", popped);
        popped
    }

    /// Replace the active stack, bottom first
    pub fn set_stack<I, S>(&mut self, contexts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stack.set(contexts);
    }

    pub fn stack(&self) -> &ContextStack {
        &self.stack
    }

    pub fn is_active(&self, context: &str) -> bool {
        self.stack.contains(context)
    }

    /// Resolve the winning action for a key in the given mode
    ///
    /// Reads one registry snapshot for the whole walk.
    pub fn lookup(&self, key: &Key, mode: &str) -> Option<Action<E>> {
        let registry = self.registry.load();
        for context in self.stack.resolution_order() {
            if let Some(action) = registry.lookup(key, context, mode) {
                tracing::trace!(
                    target: "keyroute::router",
                    "{} resolved to {} in {}",
                    key,
                    action.id,
                    context
                );
                return Some(action.clone());
            }
        }
        tracing::trace!(target: "keyroute::router", "{} unhandled (mode: {:?})", key, mode);
        None
    }

    /// Resolve and run the handler, using the host's current mode
    pub fn dispatch<M>(&self, key: &Key, modes: &M) -> Dispatch<E>
    where
        M: ModeSource + ?Sized,
    {
        let Some(action) = self.lookup(key, modes.current_mode()) else {
            return Dispatch::Unhandled;
        };
        match action.invoke() {
            Some(effect) => Dispatch::Execute {
                action_id: action.id,
                effect,
            },
            None => Dispatch::Unhandled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::Registry;

    fn router_with(bindings: Vec<(&str, Action<&'static str>)>) -> Router<&'static str> {
        let mut registry = Registry::new();
        for (key, action) in bindings {
            registry.register(key.parse().unwrap(), action).unwrap();
        }
        Router::new(Arc::new(SharedRegistry::new(registry)))
    }

    #[test]
    fn test_mode_specific_binding() {
        let mut router = router_with(vec![(
            "j",
            Action::new("move-down")
                .context("workspace")
                .mode("normal")
                .handler(|| "down"),
        )]);
        router.set_stack(["workspace"]);

        let j = Key::rune("j");
        assert_eq!(router.lookup(&j, "normal").unwrap().id, "move-down");
        assert!(router.lookup(&j, "insert").is_none());
    }

    #[test]
    fn test_modal_overrides_global_until_popped() {
        let mut router = router_with(vec![
            ("ctrl+c", Action::new("global-quit").handler(|| "quit")),
            (
                "ctrl+c",
                Action::new("modal-close")
                    .context("command-palette")
                    .handler(|| "close"),
            ),
        ]);
        router.push_context("command-palette");

        let key = Key::ctrl("c");
        assert_eq!(router.lookup(&key, "").unwrap().id, "modal-close");

        router.pop_context();
        assert!(router.stack().is_empty());
        assert_eq!(router.lookup(&key, "").unwrap().id, "global-quit");
    }

    #[test]
    fn test_inactive_context_is_not_consulted() {
        let router = router_with(vec![(
            "esc",
            Action::new("close").context("modal").handler(|| "close"),
        )]);
        assert!(router.lookup(&"esc".parse().unwrap(), "").is_none());
    }

    #[test]
    fn test_top_of_stack_wins() {
        let mut router = router_with(vec![
            ("q", Action::new("screen-q").context("screen").handler(|| "screen")),
            ("q", Action::new("modal-q").context("modal").handler(|| "modal")),
        ]);
        router.set_stack(["screen", "modal"]);
        assert_eq!(router.lookup(&Key::rune("q"), "").unwrap().id, "modal-q");

        router.set_stack(["modal", "screen"]);
        assert_eq!(router.lookup(&Key::rune("q"), "").unwrap().id, "screen-q");
    }

    #[test]
    fn test_dispatch_runs_handler() {
        let router = router_with(vec![("ctrl+c", Action::new("quit").handler(|| "bye"))]);

        let result = router.dispatch(&Key::ctrl("c"), "");
        assert_eq!(
            result,
            Dispatch::Execute {
                action_id: "quit".to_string(),
                effect: "bye"
            }
        );
        assert_eq!(router.dispatch(&Key::rune("x"), ""), Dispatch::Unhandled);
    }

    #[test]
    fn test_dispatch_reads_mode_source() {
        let mut router = router_with(vec![(
            "i",
            Action::new("enter-insert")
                .context("workspace")
                .mode("normal")
                .handler(|| "insert"),
        )]);
        router.set_stack(["workspace"]);

        let mode = String::from("normal");
        assert_eq!(router.dispatch(&Key::rune("i"), &mode).effect(), Some("insert"));

        let mode = String::from("insert");
        assert!(!router.dispatch(&Key::rune("i"), &mode).is_handled());
    }

    #[test]
    fn test_routers_are_independent() {
        let shared = Arc::new(SharedRegistry::new(Registry::new()));
        shared
            .update(|r| {
                r.register(
                    Key::rune("x"),
                    Action::new("modal-x").context("modal").handler(|| "x"),
                )
            })
            .unwrap();

        let mut a = Router::new(Arc::clone(&shared));
        let b = Router::new(Arc::clone(&shared));
        a.push_context("modal");

        assert!(a.lookup(&Key::rune("x"), "").is_some());
        assert!(b.lookup(&Key::rune("x"), "").is_none());
    }
}
