//! Validation configuration.

use serde::Deserialize;

/// Configuration for the group validator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Maximum display name length in characters (default: 255).
    pub display_name_max_length: usize,
    /// Maximum combined size of annotation keys and values in bytes
    /// (default: 262_144 = 256 KiB).
    pub total_annotation_size_limit: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            display_name_max_length: 255,
            total_annotation_size_limit: 256 * 1024,
        }
    }
}
