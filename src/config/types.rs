//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/planwrap/) and project (.planwrap/) level configuration.

use serde::{Deserialize, Serialize};

use crate::constants::grouping::{
    DEFAULT_LABEL_TEMPLATE, DEFAULT_MIN_GROUP_SIZE, DEFAULT_PATH_DELIMITER, PATTERN_MARKER,
};
use crate::tree::DocumentFormat;
use crate::types::{PlanError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Grouping engine settings
    pub grouping: GroupingConfig,

    /// Document output settings
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            grouping: GroupingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `PlanError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        self.grouping.validate()
    }
}

// =============================================================================
// Grouping Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GroupingConfig {
    /// Separator between ancestor names in a leaf's path
    pub path_delimiter: String,

    /// Container label; `{pattern}` is replaced by the group pattern
    pub label_template: String,

    /// Buckets smaller than this stay ungrouped
    pub min_group_size: usize,

    /// Merge into an existing grouping container carrying the same label
    pub reuse_existing: bool,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            path_delimiter: DEFAULT_PATH_DELIMITER.to_string(),
            label_template: DEFAULT_LABEL_TEMPLATE.to_string(),
            min_group_size: DEFAULT_MIN_GROUP_SIZE,
            reuse_existing: true,
        }
    }
}

impl GroupingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_group_size == 0 {
            return Err(PlanError::Config(
                "grouping.min_group_size must be greater than 0".to_string(),
            ));
        }

        if self.path_delimiter.is_empty() {
            return Err(PlanError::Config(
                "grouping.path_delimiter must not be empty".to_string(),
            ));
        }

        if !self.label_template.contains(PATTERN_MARKER) {
            return Err(PlanError::Config(format!(
                "grouping.label_template must contain {}, got '{}'",
                PATTERN_MARKER, self.label_template
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON documents
    pub pretty: bool,

    /// Encoding used when the CLI prints a document to stdout
    pub stdout_format: DocumentFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            stdout_format: DocumentFormat::Json,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.grouping.path_delimiter, " > ");
        assert_eq!(config.grouping.min_group_size, 1);
        assert!(config.grouping.reuse_existing);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.grouping.min_group_size = 0;
        assert!(matches!(config.validate(), Err(PlanError::Config(_))));

        let mut config = Config::default();
        config.grouping.path_delimiter.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.grouping.label_template = "Group".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [grouping]
            min_group_size = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.grouping.min_group_size, 2);
        assert_eq!(config.grouping.label_template, "{pattern}");
        assert!(config.output.pretty);
    }
}
