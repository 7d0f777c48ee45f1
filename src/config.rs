//! Registry configuration
//!
//! Hosts usually embed this in their own config file; every field has a
//! default so an empty document is valid.

use serde::{Deserialize, Serialize};

use crate::keymap::KeymapError;

/// How a lookup with an empty current mode treats mode-specific bindings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyModePolicy {
    /// Only wildcard (mode-less) bindings match
    #[default]
    WildcardOnly,
    /// Wildcard bindings first, then any mode-specific binding
    MatchAny,
}

/// Behavioral switches for a [`crate::keymap::Registry`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub empty_mode: EmptyModePolicy,

    /// Abort imports on warning-severity conflicts too
    #[serde(default)]
    pub strict_import: bool,

    /// Log every detected conflict from `Registry::check` (startup validation)
    #[serde(default)]
    pub log_conflicts: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            empty_mode: EmptyModePolicy::default(),
            strict_import: false,
            log_conflicts: false,
        }
    }
}

impl RegistryConfig {
    /// Parse config from a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self, KeymapError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| KeymapError::Parse(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String, KeymapError> {
        serde_yaml::to_string(self).map_err(|e| KeymapError::Serialize(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.empty_mode, EmptyModePolicy::WildcardOnly);
        assert!(!config.strict_import);
        assert!(!config.log_conflicts);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(RegistryConfig::from_yaml("").unwrap(), RegistryConfig::default());
    }

    #[test]
    fn test_partial_yaml() {
        let config = RegistryConfig::from_yaml("empty_mode: match_any\n").unwrap();
        assert_eq!(config.empty_mode, EmptyModePolicy::MatchAny);
        assert!(!config.strict_import);
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = RegistryConfig {
            empty_mode: EmptyModePolicy::MatchAny,
            strict_import: true,
            log_conflicts: true,
        };
        let yaml = config.to_yaml().unwrap();
        assert_eq!(RegistryConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_invalid_policy_is_parse_error() {
        let err = RegistryConfig::from_yaml("empty_mode: sometimes\n").unwrap_err();
        assert!(matches!(err, KeymapError::Parse(_)));
    }
}
