//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::sync::Arc;

use keyroute::keymap::{Action, Key, Registry, Router, SharedRegistry};

/// Effect type used across integration tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Quit,
    Close,
    Move(&'static str),
    Mode(&'static str),
    Named(String),
}

/// An action whose handler returns `Effect::Named(id)`
pub fn named(id: &str) -> Action<Effect> {
    let effect = Effect::Named(id.to_string());
    Action::new(id).handler(move || effect.clone())
}

pub fn key(s: &str) -> Key {
    s.parse()
        .unwrap_or_else(|e| panic!("bad key {:?} in test: {}", s, e))
}

/// A small editor-like registry: global quit, vim motions, a modal palette
pub fn editor_registry() -> Registry<Effect> {
    let mut registry = Registry::new();
    registry
        .register(key("ctrl+c"), Action::new("quit").category("App").handler(|| Effect::Quit))
        .unwrap();
    registry
        .register(
            key("j"),
            Action::new("move-down")
                .context("workspace")
                .mode("normal")
                .category("Navigation")
                .handler(|| Effect::Move("down")),
        )
        .unwrap();
    registry
        .register(
            key("k"),
            Action::new("move-up")
                .context("workspace")
                .mode("normal")
                .category("Navigation")
                .handler(|| Effect::Move("up")),
        )
        .unwrap();
    registry
        .register(
            key("i"),
            Action::new("enter-insert")
                .context("workspace")
                .mode("normal")
                .category("Mode")
                .handler(|| Effect::Mode("insert")),
        )
        .unwrap();
    registry
        .register(
            key("esc"),
            Action::new("exit-insert")
                .context("workspace")
                .mode("insert")
                .category("Mode")
                .handler(|| Effect::Mode("normal")),
        )
        .unwrap();
    registry
        .register(
            key("ctrl+c"),
            Action::new("close-palette")
                .context("command-palette")
                .category("Palette")
                .handler(|| Effect::Close),
        )
        .unwrap();
    registry
}

pub fn editor_router() -> Router<Effect> {
    Router::new(Arc::new(SharedRegistry::new(editor_registry())))
}
