//! Conflict detection between bindings
//!
//! Two bindings conflict when they share a key and a context and their mode
//! scopes overlap: identical modes (both wildcard included) can never both be
//! returned by a lookup, so one silently shadows the other (`Error`). A
//! wildcard binding next to a mode-specific one is reachable only outside that
//! mode, which is usually intended but worth surfacing (`Warning`). Distinct
//! specific modes never overlap and are not reported.

use std::fmt;

use serde::Serialize;

use super::binding::Binding;
use super::types::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One of the two bindings involved in a conflict
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ConflictSide {
    pub action_id: String,
    pub mode: Option<String>,
    pub priority: i32,
}

impl<E> From<&Binding<E>> for ConflictSide {
    fn from(binding: &Binding<E>) -> Self {
        Self {
            action_id: binding.action.id.clone(),
            mode: binding.action.mode.clone(),
            priority: binding.action.priority,
        }
    }
}

/// A pair of bindings competing for the same key in an overlapping scope
///
/// The two sides are stored in a canonical order, so the conflict found for
/// (A, B) is equal to the one found for (B, A).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Conflict {
    pub key: Key,
    pub context: String,
    pub severity: Severity,
    pub first: ConflictSide,
    pub second: ConflictSide,
}

impl Conflict {
    /// Compare two bindings, returning the conflict between them if any
    pub fn between<E>(a: &Binding<E>, b: &Binding<E>) -> Option<Conflict> {
        if a.key != b.key || a.context() != b.context() {
            return None;
        }

        let severity = match (a.mode(), b.mode()) {
            (x, y) if x == y => Severity::Error,
            (None, Some(_)) | (Some(_), None) => Severity::Warning,
            _ => return None,
        };

        let (first, second) = {
            let a = ConflictSide::from(a);
            let b = ConflictSide::from(b);
            if a <= b {
                (a, b)
            } else {
                (b, a)
            }
        };

        Some(Conflict {
            key: a.key.clone(),
            context: a.context().to_string(),
            severity,
            first,
            second,
        })
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// True if either side is the given action
    pub fn involves(&self, action_id: &str) -> bool {
        self.first.action_id == action_id || self.second.action_id == action_id
    }

    fn sort_key(&self) -> (String, &str, &ConflictSide, &ConflictSide) {
        (self.key.to_string(), self.context.as_str(), &self.first, &self.second)
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = |side: &ConflictSide| side.mode.clone().unwrap_or_else(|| "*".to_string());
        write!(
            f,
            "[{}] {} in context '{}': '{}' (mode {}) vs '{}' (mode {})",
            self.severity,
            self.key,
            self.context,
            self.first.action_id,
            mode(&self.first),
            self.second.action_id,
            mode(&self.second),
        )
    }
}

/// Scan groups of same-key bindings, reporting every unordered conflicting pair once
pub fn detect_conflicts<'a, E: 'a, G>(groups: impl IntoIterator<Item = G>) -> Vec<Conflict>
where
    G: IntoIterator<Item = &'a Binding<E>>,
{
    let mut conflicts = Vec::new();
    for group in groups {
        let group: Vec<&Binding<E>> = group.into_iter().collect();
        for (i, a) in group.iter().enumerate() {
            for b in &group[i + 1..] {
                if let Some(conflict) = Conflict::between(a, b) {
                    conflicts.push(conflict);
                }
            }
        }
    }
    sort_conflicts(&mut conflicts);
    conflicts
}

/// Conflicts a candidate binding would create against existing ones
pub fn conflicts_with<'a, E: 'a>(
    candidate: &Binding<E>,
    existing: impl IntoIterator<Item = &'a Binding<E>>,
) -> Vec<Conflict> {
    let mut conflicts: Vec<Conflict> = existing
        .into_iter()
        .filter_map(|b| Conflict::between(b, candidate))
        .collect();
    sort_conflicts(&mut conflicts);
    conflicts
}

pub(crate) fn sort_conflicts(conflicts: &mut [Conflict]) {
    conflicts.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}
