//! Audit configuration.
//!
//! Plain structs built by the host (directly or via serde) and passed by
//! reference into each module. Missing fields fall back to the defaults
//! below.

use serde::{Deserialize, Serialize};

use crate::rules::Rule;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub assets: AssetsConfig,
    /// Severity overrides applied on top of descriptor defaults.
    pub rules: Vec<Rule>,
    /// Scope used to pick scoped override rules.
    pub scope: Option<String>,
}

/// Settings for the resources scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Path segment marking runtime-loadable resources, matched
    /// case-insensitively.
    pub resources_segment: String,
    /// Path segment excluding editor-only artifacts, matched
    /// case-insensitively.
    pub excluded_segment: String,
    /// Extensions never interned as asset nodes (with the leading dot).
    pub code_extensions: Vec<String>,
    /// Roots matching any of these patterns are critical roots. Same pattern
    /// syntax as descriptors.
    pub critical_root_patterns: Vec<String>,
    /// Compute dependency closures on the rayon pool.
    pub parallel_closures: bool,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            resources_segment: "/resources/".to_string(),
            excluded_segment: "/editor/".to_string(),
            code_extensions: vec![".cs".to_string()],
            critical_root_patterns: Vec::new(),
            parallel_closures: false,
        }
    }
}
