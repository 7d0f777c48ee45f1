//! keyroute - context-aware key dispatch
//!
//! This crate maps key events to actions scoped by UI context and modal
//! editing mode, detects conflicting bindings, and lets users export and
//! re-import their keymap.
//!
//! The host owns its effect type `E`; handlers return an `E` and the crate
//! never inspects it.

pub mod config;
pub mod keymap;
pub mod tracing;

// Re-export commonly used types
pub use config::{EmptyModePolicy, RegistryConfig};
pub use keymap::{
    Action, Conflict, ContextStack, Dispatch, Key, KeyCode, KeymapError, Modifiers, Registry,
    Router, Severity, SharedRegistry,
};
