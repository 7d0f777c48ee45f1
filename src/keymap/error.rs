//! Errors raised by registration, key parsing and keymap customization

use super::conflict::Conflict;

pub type Result<T, E = KeymapError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KeymapError {
    /// A non-forced registration collided with an existing binding
    #[error("binding conflict: {0}")]
    Conflict(Box<Conflict>),

    /// Empty action ID or missing handler; a programmer error
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// An imported record names an action that is no longer registered.
    /// Collected as a warning, never returned as the result of an import.
    #[error("action '{action_id}' (bound to {key}) no longer exists")]
    ActionNotFound { action_id: String, key: String },

    /// The staged import contains conflicts that must be resolved first
    #[error(
        "import aborted: {} conflicting binding(s), first: {}",
        .conflicts.len(),
        first_conflict(.conflicts)
    )]
    ImportConflict { conflicts: Vec<Conflict> },

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("serialize error: {0}")]
    Serialize(String),

    #[error("import cancelled")]
    Cancelled,
}

impl KeymapError {
    /// Conflicts carried by this error, if any
    pub fn conflicts(&self) -> &[Conflict] {
        match self {
            KeymapError::Conflict(conflict) => std::slice::from_ref(conflict.as_ref()),
            KeymapError::ImportConflict { conflicts } => conflicts,
            _ => &[],
        }
    }
}

fn first_conflict(conflicts: &[Conflict]) -> String {
    conflicts
        .first()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "none".to_string())
}
