//! Registry: the store of every key → action binding
//!
//! The registry knows nothing about which contexts are currently active;
//! that is the router's job. It answers "what is bound to this key in this
//! context and mode" and reports conflicts.

use std::collections::{BTreeMap, HashMap};

use super::action::{normalize_mode, Action};
use super::binding::Binding;
use super::conflict::{self, Conflict};
use super::error::{KeymapError, Result};
use super::types::Key;
use crate::config::{EmptyModePolicy, RegistryConfig};

/// A stored binding plus its registration sequence number
struct Slot<E> {
    binding: Binding<E>,
    seq: u64,
}

impl<E> Clone for Slot<E> {
    fn clone(&self) -> Self {
        Self {
            binding: self.binding.clone(),
            seq: self.seq,
        }
    }
}

/// The registry stores all bindings and the catalog of known actions
pub struct Registry<E> {
    /// Bindings grouped by key, each group in registration order
    bindings: HashMap<Key, Vec<Slot<E>>>,
    /// Every action ever registered or defined, by ID
    actions: HashMap<String, Action<E>>,
    next_seq: u64,
    config: RegistryConfig,
}

impl<E> Registry<E> {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            bindings: HashMap::new(),
            actions: HashMap::new(),
            next_seq: 0,
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Make an action known by ID without binding it to any key
    ///
    /// Imports can only re-link IDs the registry already knows.
    pub fn define(&mut self, action: Action<E>) -> Result<()> {
        validate_action(&action)?;
        self.actions.insert(action.id.clone(), action);
        Ok(())
    }

    /// Insert a binding, rejecting error-severity collisions
    ///
    /// On error the registry is unchanged.
    pub fn register(&mut self, key: Key, action: Action<E>) -> Result<()> {
        validate_key(&key)?;
        validate_action(&action)?;
        let binding = Binding::new(key, action);

        let existing = self.group(&binding.key);
        if let Some(conflict) = conflict::conflicts_with(&binding, existing)
            .into_iter()
            .find(Conflict::is_error)
        {
            tracing::debug!("Rejected binding: {}", conflict);
            return Err(KeymapError::Conflict(Box::new(conflict)));
        }

        self.insert(binding);
        Ok(())
    }

    /// Insert a binding, replacing whatever occupies the same (key, context, mode)
    ///
    /// Returns how many bindings were replaced. Other bindings are untouched.
    pub fn force_register(&mut self, key: Key, action: Action<E>) -> Result<usize> {
        validate_key(&key)?;
        validate_action(&action)?;
        let replaced = self.unbind(&key, &action.context, action.mode_str());
        if replaced > 0 {
            tracing::debug!(
                "Overriding {} binding(s) for {} in {} with {}",
                replaced,
                key,
                action.context,
                action.id
            );
        }
        self.insert(Binding::new(key, action));
        Ok(replaced)
    }

    /// Insert without any collision check; callers validate first
    pub(crate) fn insert_unchecked(&mut self, key: Key, action: Action<E>) {
        self.insert(Binding::new(key, action));
    }

    fn insert(&mut self, binding: Binding<E>) {
        tracing::debug!(
            "Registered {} -> {} (context: {}, mode: {})",
            binding.key,
            binding.action.id,
            binding.action.context,
            binding.mode().unwrap_or("*")
        );
        self.actions
            .entry(binding.action.id.clone())
            .or_insert_with(|| binding.action.clone());

        let seq = self.next_seq;
        self.next_seq += 1;
        self.bindings
            .entry(binding.key.clone())
            .or_default()
            .push(Slot { binding, seq });
    }

    /// Remove the bindings occupying exactly (key, context, mode)
    pub fn unbind(&mut self, key: &Key, context: &str, mode: &str) -> usize {
        let mode = normalize_mode(mode.to_string());
        let Some(group) = self.bindings.get_mut(key) else {
            return 0;
        };

        let before = group.len();
        group.retain(|slot| !slot.binding.occupies(key, context, mode.as_deref()));
        let removed = before - group.len();

        if group.is_empty() {
            self.bindings.remove(key);
        }
        removed
    }

    /// Best binding for an exact (key, context) pair
    ///
    /// Prefers an exact mode match over a wildcard binding; within the same
    /// tier the highest priority wins, then the latest registration.
    pub fn lookup(&self, key: &Key, context: &str, mode: &str) -> Option<&Action<E>> {
        if mode.is_empty() {
            return self
                .best_match(key, context, |m| m.is_none())
                .or_else(|| match self.config.empty_mode {
                    EmptyModePolicy::WildcardOnly => None,
                    EmptyModePolicy::MatchAny => self.best_match(key, context, |m| m.is_some()),
                });
        }

        self.best_match(key, context, |m| m == Some(mode))
            .or_else(|| self.best_match(key, context, |m| m.is_none()))
    }

    /// Highest priority, then latest registered, among bindings whose mode passes `tier`
    fn best_match<'a>(
        &'a self,
        key: &Key,
        context: &str,
        tier: impl Fn(Option<&str>) -> bool,
    ) -> Option<&'a Action<E>> {
        self.group(key)
            .zip(0usize..)
            .filter(|&(b, _)| b.context() == context && tier(b.mode()))
            .max_by_key(|&(b, idx)| (b.action.priority, idx))
            .map(|(b, _)| &b.action)
    }

    /// All bindings, in no particular order
    pub fn list(&self) -> Vec<&Binding<E>> {
        self.slots().map(|s| &s.binding).collect()
    }

    pub fn list_context(&self, context: &str) -> Vec<&Binding<E>> {
        self.slots()
            .map(|s| &s.binding)
            .filter(|b| b.context() == context)
            .collect()
    }

    /// Bindings restricted to `mode`; an empty mode lists wildcard bindings
    pub fn list_mode(&self, mode: &str) -> Vec<&Binding<E>> {
        let mode = normalize_mode(mode.to_string());
        self.slots()
            .map(|s| &s.binding)
            .filter(|b| b.mode() == mode.as_deref())
            .collect()
    }

    /// First-registered binding of an action
    pub fn find_by_id(&self, action_id: &str) -> Option<&Binding<E>> {
        self.slots()
            .filter(|s| s.binding.action.id == action_id)
            .min_by_key(|s| s.seq)
            .map(|s| &s.binding)
    }

    /// Catalog lookup: any action registered or defined under this ID
    pub fn action(&self, action_id: &str) -> Option<&Action<E>> {
        self.actions.get(action_id)
    }

    pub fn actions(&self) -> impl Iterator<Item = &Action<E>> {
        self.actions.values()
    }

    /// Keys bound to an action, in registration order
    pub fn keys_for(&self, action_id: &str) -> Vec<&Key> {
        let mut slots: Vec<&Slot<E>> = self
            .slots()
            .filter(|s| s.binding.action.id == action_id)
            .collect();
        slots.sort_by_key(|s| s.seq);
        slots.into_iter().map(|s| &s.binding.key).collect()
    }

    /// Get display string for an action's first keybinding
    pub fn display_for(&self, action_id: &str) -> Option<String> {
        self.find_by_id(action_id).map(|b| b.display_string())
    }

    /// Distinct categories of bound actions, sorted
    pub fn categories(&self) -> Vec<String> {
        self.by_category().into_keys().collect()
    }

    /// Bindings grouped by action category, each group sorted by action ID then key
    pub fn by_category(&self) -> BTreeMap<String, Vec<&Binding<E>>> {
        let mut groups: BTreeMap<String, Vec<&Binding<E>>> = BTreeMap::new();
        for binding in self.slots().map(|s| &s.binding) {
            groups
                .entry(binding.action.category.clone())
                .or_default()
                .push(binding);
        }
        for bindings in groups.values_mut() {
            bindings.sort_by(|a, b| {
                a.action_id()
                    .cmp(b.action_id())
                    .then_with(|| a.key.cmp(&b.key))
            });
        }
        groups
    }

    /// Every pairwise collision in the registry
    pub fn detect_conflicts(&self) -> Vec<Conflict> {
        conflict::detect_conflicts(
            self.bindings
                .values()
                .map(|group| group.iter().map(|s| &s.binding)),
        )
    }

    /// Conflicts `register(key, action)` would run into, without mutating
    pub fn validate(&self, key: &Key, action: &Action<E>) -> Vec<Conflict> {
        let candidate = Binding::new(key.clone(), action.clone());
        conflict::conflicts_with(&candidate, self.group(key))
    }

    /// Run conflict detection, logging findings when `log_conflicts` is set
    pub fn check(&self) -> Vec<Conflict> {
        let conflicts = self.detect_conflicts();
        if self.config.log_conflicts {
            for conflict in &conflicts {
                if conflict.is_error() {
                    tracing::warn!("Keymap conflict: {}", conflict);
                } else {
                    tracing::info!("Keymap overlap: {}", conflict);
                }
            }
            tracing::info!(
                "Checked {} bindings, {} conflict(s)",
                self.len(),
                conflicts.len()
            );
        }
        conflicts
    }

    pub fn len(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn group<'a>(&'a self, key: &Key) -> impl Iterator<Item = &'a Binding<E>> + 'a {
        self.bindings
            .get(key)
            .into_iter()
            .flatten()
            .map(|s| &s.binding)
    }

    fn slots(&self) -> impl Iterator<Item = &Slot<E>> {
        self.bindings.values().flatten()
    }
}

/// Only keys whose text form parses back can be exported and re-imported
fn validate_key(key: &Key) -> Result<()> {
    if key.code.is_valid() {
        Ok(())
    } else {
        Err(KeymapError::InvalidKey(format!(
            "{:?} has no parseable text form",
            key.code
        )))
    }
}

fn validate_action<E>(action: &Action<E>) -> Result<()> {
    if action.id.is_empty() {
        return Err(KeymapError::InvalidAction(
            "action ID must not be empty".to_string(),
        ));
    }
    if action.context.is_empty() {
        return Err(KeymapError::InvalidAction(format!(
            "action '{}' has an empty context",
            action.id
        )));
    }
    if !action.has_handler() {
        return Err(KeymapError::InvalidAction(format!(
            "action '{}' has no handler",
            action.id
        )));
    }
    Ok(())
}

impl<E> Default for Registry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for Registry<E> {
    fn clone(&self) -> Self {
        Self {
            bindings: self.bindings.clone(),
            actions: self.actions.clone(),
            next_seq: self.next_seq,
            config: self.config.clone(),
        }
    }
}

impl<E> std::fmt::Debug for Registry<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("bindings", &self.len())
            .field("actions", &self.actions.len())
            .field("config", &self.config)
            .finish()
    }
}
