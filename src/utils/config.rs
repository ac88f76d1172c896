//! Configuration and constants for the library and CLI.
//!
//! Ranking limits and indicator heuristics are fixed. Viewport geometry and
//! compact value length can be overridden from a TOML file.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current report output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Version synthesized for bare event arrays (no envelope)
pub const DOCUMENT_VERSION: &str = "1.0";

/// Entries kept in each ranked method view
pub const TOP_METHODS: usize = 10;

/// Entries kept in the slow-call list
pub const TOP_SLOW_CALLS: usize = 15;

/// A call is a hotspot above this fraction of total recorded time
pub const HOTSPOT_FRACTION: f64 = 0.10;

/// A method has high variance when max time exceeds average times this factor
pub const HIGH_VARIANCE_FACTOR: f64 = 2.0;

/// Group key used when a node has no defined class
pub const UNKNOWN_CLASS: &str = "Unknown";

/// Nesting limit for value formatting
pub const MAX_VALUE_DEPTH: usize = 16;

/// Parameters shown before compact mode collapses the list
pub const COMPACT_PARAM_LIMIT: usize = 3;

pub const DEFAULT_ROW_HEIGHT: f64 = 24.0;
pub const DEFAULT_OVERSCAN: usize = 10;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 600.0;
pub const DEFAULT_COMPACT_VALUE_LEN: usize = 50;

/// Explorer settings, optionally loaded from TOML
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Estimated height of one tree row in pixels
    pub row_height: f64,

    /// Rows materialized beyond each edge of the viewport
    pub overscan: usize,

    /// Viewport height in pixels
    pub viewport_height: f64,

    /// Maximum characters for a compact value
    pub compact_value_len: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            compact_value_len: DEFAULT_COMPACT_VALUE_LEN,
        }
    }
}

impl ExplorerConfig {
    /// Check that geometry values are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.row_height.is_finite() || self.row_height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "row_height must be positive, got {}",
                self.row_height
            )));
        }
        if !self.viewport_height.is_finite() || self.viewport_height < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "viewport_height must be non-negative, got {}",
                self.viewport_height
            )));
        }
        if self.compact_value_len < 4 {
            return Err(ConfigError::Invalid(
                "compact_value_len must be at least 4".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load explorer settings from a TOML file
///
/// # Errors
/// * `ConfigError::Io` - If file cannot be read
/// * `ConfigError::Toml` - If TOML is invalid
/// * `ConfigError::Invalid` - If values are out of range
pub fn load_config(path: impl AsRef<Path>) -> Result<ExplorerConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: ExplorerConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ExplorerConfig = toml::from_str("overscan = 3").unwrap();
        assert_eq!(config.overscan, 3);
        assert_eq!(config.row_height, DEFAULT_ROW_HEIGHT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_row_height() {
        let config = ExplorerConfig {
            row_height: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calltrace.toml");
        fs::write(&path, "row_height = 18.0\nviewport_height = 360.0\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.row_height, 18.0);
        assert_eq!(config.overscan, DEFAULT_OVERSCAN);

        fs::write(&path, "row_height = \"tall\"").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }
}
