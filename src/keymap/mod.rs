//! Context-aware key dispatch
//!
//! This module maps key events to actions, scoped by UI context and modal
//! editing mode:
//! - Keys are normalized into a canonical, hashable [`Key`]
//! - The [`Registry`] stores bindings and reports conflicts between them
//! - The [`Router`] walks the active context stack and fires one action
//! - Keymaps can be exported and re-imported for user customization
//!
//! # Architecture
//!
//! ```text
//! crossterm::KeyEvent → Key → Router::dispatch() → Registry::lookup() → Action → E
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut registry = Registry::new();
//! registry.register("ctrl+c".parse()?, Action::new("quit").handler(|| Msg::Quit))?;
//!
//! let mut router = Router::new(Arc::new(SharedRegistry::new(registry)));
//! router.push_context("command-palette");
//! let outcome = router.dispatch(&key, "normal");
//! ```

mod action;
mod binding;
mod conflict;
mod context;
#[cfg(feature = "crossterm")]
mod crossterm_adapter;
mod error;
pub mod interchange;
mod parse;
mod registry;
mod router;
mod search;
mod shared;
mod types;

pub use action::{Action, Handler};
pub use binding::Binding;
pub use conflict::{conflicts_with, detect_conflicts, Conflict, ConflictSide, Severity};
pub use context::{ContextStack, GLOBAL};
#[cfg(feature = "crossterm")]
pub use crossterm_adapter::key_from_crossterm;
pub use error::{KeymapError, Result};
pub use interchange::{export, import, validate, Format, ImportReport};
pub use parse::parse_key;
pub use registry::Registry;
pub use router::{Dispatch, ModeSource, Router};
pub use search::{search_actions, SearchHit};
pub use shared::SharedRegistry;
pub use types::{Key, KeyCode, Modifiers};
