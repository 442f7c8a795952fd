//! Global Constants
//!
//! Centralized constants for grouping and configuration.

/// Name normalization constants
pub mod normalize {
    /// Replaces 8-4-4-4-12 hex UUIDs
    pub const UUID_PLACEHOLDER: &str = "<UUID>";

    /// Replaces every maximal run of ASCII digits
    pub const NUMBER_PLACEHOLDER: &str = "<N>";

    /// Separators dropped together with a trailing number placeholder
    pub const TRAILING_SEPARATORS: &[char] = &[' ', '\t', '-', '_', '#', '.', ':', '/'];
}

/// Grouping engine defaults
pub mod grouping {
    /// Joins ancestor display names in a leaf's ancestor path
    pub const DEFAULT_PATH_DELIMITER: &str = " > ";

    /// Marker replaced by the group pattern in a container label template
    pub const PATTERN_MARKER: &str = "{pattern}";

    /// Default container label template
    pub const DEFAULT_LABEL_TEMPLATE: &str = "{pattern}";

    /// Pattern used when a group's pattern and leaf names are all blank
    pub const DEFAULT_GROUP_LABEL: &str = "Group";

    /// Smallest bucket that receives a grouping container
    pub const DEFAULT_MIN_GROUP_SIZE: usize = 1;
}

/// Configuration file locations
pub mod paths {
    /// Project-local directory name
    pub const PROJECT_DIR: &str = ".planwrap";

    /// Config file name inside global and project directories
    pub const CONFIG_FILE: &str = "config.toml";

    /// Environment variable prefix
    pub const ENV_PREFIX: &str = "PLANWRAP_";
}
