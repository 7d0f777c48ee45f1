//! Active-context stack
//!
//! The host pushes a context when a modal opens and pops it when the modal
//! closes. The topmost context gets first refusal on every key; `"global"`
//! is always implicitly present underneath everything else.

/// The context that is always active at the lowest priority
pub const GLOBAL: &str = "global";

/// Ordered stack of active context names, top = most specific
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextStack {
    contexts: Vec<String>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a stack from bottom to top
    pub fn from_bottom<I, S>(contexts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            contexts: contexts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push(&mut self, context: impl Into<String>) {
        self.contexts.push(context.into());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.contexts.pop()
    }

    /// Replace the whole stack, bottom first
    pub fn set<I, S>(&mut self, contexts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self = Self::from_bottom(contexts);
    }

    pub fn top(&self) -> Option<&str> {
        self.contexts.last().map(String::as_str)
    }

    /// Contexts from most to least specific, ending with the implicit global
    ///
    /// An explicit `"global"` entry is skipped so global is always the last tier.
    pub fn resolution_order(&self) -> impl Iterator<Item = &str> {
        self.contexts
            .iter()
            .rev()
            .map(String::as_str)
            .filter(|c| *c != GLOBAL)
            .chain(std::iter::once(GLOBAL))
    }

    /// Whether a context is active (global always is)
    pub fn contains(&self, context: &str) -> bool {
        context == GLOBAL || self.contexts.iter().any(|c| c == context)
    }

    /// Explicit contexts, bottom first
    pub fn as_slice(&self) -> &[String] {
        &self.contexts
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}
