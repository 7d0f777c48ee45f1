//! Keymap export and import
//!
//! A keymap document is the user-editable form of a registry:
//!
//! ```yaml
//! version: 1
//! bindings:
//!   - key: "ctrl+c"
//!     action_id: quit
//!     context: global
//!   - key: j
//!     action_id: move-down
//!     context: workspace
//!     mode: normal
//!   - key: "ctrl+p"
//!     context: global
//!     unbound: true
//! ```
//!
//! Handlers are never serialized; on import each `action_id` is re-linked to
//! an action the registry already knows. Imports are staged on a copy of the
//! registry and only committed when the result is free of blocking conflicts.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use super::binding::Binding;
use super::conflict::Conflict;
use super::context::GLOBAL;
use super::error::{KeymapError, Result};
use super::registry::Registry;
use super::shared::SharedRegistry;
use super::types::Key;
use crate::config::RegistryConfig;

pub const FORMAT_VERSION: u32 = 1;

/// Serialization format for [`export_as`]; import accepts either
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

/// Root structure of a keymap document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeymapDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub bindings: Vec<BindingRecord>,
}

/// A single binding entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingRecord {
    pub key: Key,
    #[serde(default)]
    pub action_id: String,
    #[serde(default = "default_context")]
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Binding priority; absent means 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    /// Informational only, ignored on import
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Informational only, ignored on import
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    /// Remove whatever occupies (key, context, mode) instead of binding it
    #[serde(default, skip_serializing_if = "is_false")]
    pub unbound: bool,
}

fn default_version() -> u32 {
    FORMAT_VERSION
}

fn default_context() -> String {
    GLOBAL.to_string()
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl<E> From<&Binding<E>> for BindingRecord {
    fn from(binding: &Binding<E>) -> Self {
        Self {
            key: binding.key.clone(),
            action_id: binding.action.id.clone(),
            context: binding.action.context.clone(),
            mode: binding.action.mode.clone(),
            priority: (binding.action.priority != 0).then_some(binding.action.priority),
            description: binding.action.description.clone(),
            category: binding.action.category.clone(),
            unbound: false,
        }
    }
}

/// What an import did (or, for [`validate`], would do)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Records bound into the staged registry
    pub applied: usize,
    /// Bindings removed by `unbound` records
    pub removed: usize,
    /// Non-fatal problems, such as records naming actions that no longer exist
    pub warnings: Vec<KeymapError>,
    /// Every conflict in the staged registry
    pub conflicts: Vec<Conflict>,
}

impl ImportReport {
    pub fn has_error_conflicts(&self) -> bool {
        self.conflicts.iter().any(Conflict::is_error)
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.conflicts.is_empty()
    }

    /// Conflicts that would stop a commit under `config`
    fn blocking(&self, config: &RegistryConfig) -> Vec<Conflict> {
        self.conflicts
            .iter()
            .filter(|c| c.is_error() || config.strict_import)
            .cloned()
            .collect()
    }
}

/// Build the document for a registry, records sorted by context, mode, key, action
pub fn document<E>(registry: &Registry<E>) -> KeymapDocument {
    let mut bindings: Vec<BindingRecord> = registry
        .list()
        .into_iter()
        .map(BindingRecord::from)
        .collect();
    bindings.sort_by_cached_key(|r| {
        (
            r.context.clone(),
            r.mode.clone(),
            r.key.to_string(),
            r.action_id.clone(),
        )
    });
    KeymapDocument {
        version: FORMAT_VERSION,
        bindings,
    }
}

/// Serialize every binding as YAML
pub fn export<E>(registry: &Registry<E>) -> Result<Vec<u8>> {
    export_as(registry, Format::Yaml)
}

pub fn export_as<E>(registry: &Registry<E>, format: Format) -> Result<Vec<u8>> {
    let doc = document(registry);
    let text = match format {
        Format::Yaml => {
            serde_yaml::to_string(&doc).map_err(|e| KeymapError::Serialize(e.to_string()))?
        }
        Format::Json => serde_json::to_string_pretty(&doc)
            .map_err(|e| KeymapError::Serialize(e.to_string()))?,
    };
    Ok(text.into_bytes())
}

/// Parse a keymap document (YAML or JSON)
pub fn parse_document(bytes: &[u8]) -> Result<KeymapDocument> {
    let text = std::str::from_utf8(bytes).map_err(|e| KeymapError::Parse(e.to_string()))?;
    if text.trim().is_empty() {
        return Ok(KeymapDocument {
            version: FORMAT_VERSION,
            bindings: Vec::new(),
        });
    }

    let doc: KeymapDocument =
        serde_yaml::from_str(text).map_err(|e| KeymapError::Parse(e.to_string()))?;
    if doc.version == 0 || doc.version > FORMAT_VERSION {
        return Err(KeymapError::Parse(format!(
            "unsupported keymap version {} (expected {})",
            doc.version, FORMAT_VERSION
        )));
    }
    Ok(doc)
}

/// Merge a document into the live registry, all or nothing
///
/// The live registry is replaced atomically on success and untouched on any
/// error. Warnings and non-blocking conflicts come back in the report.
pub fn import<E>(bytes: &[u8], shared: &SharedRegistry<E>) -> Result<ImportReport> {
    import_with_cancel(bytes, shared, &AtomicBool::new(false))
}

/// [`import`] that can be abandoned by setting `cancel` from another thread
pub fn import_with_cancel<E>(
    bytes: &[u8],
    shared: &SharedRegistry<E>,
    cancel: &AtomicBool,
) -> Result<ImportReport> {
    let doc = parse_document(bytes)?;
    loop {
        let live = shared.load();
        let (staging, report) = stage(doc.clone(), &live, Some(cancel))?;
        ensure_committable(&report, live.config())?;

        if cancel.load(Ordering::Relaxed) {
            return Err(KeymapError::Cancelled);
        }
        if shared.publish(&live, staging) {
            log_commit(&report);
            return Ok(report);
        }
        tracing::debug!("Registry changed during import, restaging");
    }
}

/// Merge a document into a registry owned by the caller, all or nothing
pub fn apply<E>(bytes: &[u8], registry: &mut Registry<E>) -> Result<ImportReport> {
    let doc = parse_document(bytes)?;
    let (staging, report) = stage(doc, registry, None)?;
    ensure_committable(&report, registry.config())?;

    *registry = staging;
    log_commit(&report);
    Ok(report)
}

/// Dry run of an import: report what would happen without committing
///
/// Fails only if the document cannot be parsed; conflicts of any severity
/// are returned in the report.
pub fn validate<E>(bytes: &[u8], registry: &Registry<E>) -> Result<ImportReport> {
    let doc = parse_document(bytes)?;
    let (_, report) = stage(doc, registry, None)?;
    Ok(report)
}

fn ensure_committable(report: &ImportReport, config: &RegistryConfig) -> Result<()> {
    let blocking = report.blocking(config);
    if blocking.is_empty() {
        return Ok(());
    }
    for conflict in &blocking {
        tracing::warn!("Import blocked by conflict: {}", conflict);
    }
    Err(KeymapError::ImportConflict {
        conflicts: blocking,
    })
}

fn log_commit(report: &ImportReport) {
    tracing::info!(
        "Imported keymap: {} applied, {} removed, {} skipped, {} conflict(s)",
        report.applied,
        report.removed,
        report.warnings.len(),
        report.conflicts.len()
    );
}

type SlotKey = (Key, String, Option<String>);

/// Apply records to a copy of `registry`
///
/// Records override bindings that existed before the import. Two records in
/// the same document claiming the same slot are both kept so the conflict
/// surfaces instead of one silently winning.
fn stage<E>(
    doc: KeymapDocument,
    registry: &Registry<E>,
    cancel: Option<&AtomicBool>,
) -> Result<(Registry<E>, ImportReport)> {
    let mut staging = registry.clone();
    let mut report = ImportReport::default();
    let mut claimed: HashMap<SlotKey, String> = HashMap::new();

    for record in doc.bindings {
        if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
            tracing::debug!("Import cancelled after {} record(s)", report.applied);
            return Err(KeymapError::Cancelled);
        }

        let mode = record.mode.filter(|m| !m.is_empty());

        if record.unbound {
            let mode = mode.as_deref().unwrap_or("");
            report.removed += staging.unbind(&record.key, &record.context, mode);
            continue;
        }

        let Some(action) = staging.action(&record.action_id) else {
            tracing::warn!(
                "Skipping binding {}: action '{}' no longer exists",
                record.key,
                record.action_id
            );
            report.warnings.push(KeymapError::ActionNotFound {
                action_id: record.action_id,
                key: record.key.to_string(),
            });
            continue;
        };
        // The record, not the catalog, decides the binding's priority
        let action = action
            .rescoped(record.context.clone(), mode.clone())
            .priority(record.priority.unwrap_or(0));

        let slot: SlotKey = (record.key.clone(), record.context, mode);
        let previous = claimed.get(&slot).cloned();
        match previous {
            Some(id) if id == record.action_id => {
                tracing::debug!("Skipping duplicate record {} -> {}", record.key, id);
                continue;
            }
            Some(_) => staging.insert_unchecked(record.key, action),
            None => {
                staging.force_register(record.key, action)?;
                claimed.insert(slot, record.action_id);
            }
        }
        report.applied += 1;
    }

    report.conflicts = staging.detect_conflicts();
    Ok((staging, report))
}
