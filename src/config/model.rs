//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for a brigade workspace.
///
/// This struct represents the contents of `.brigade/config.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Persona discovery
    // =========================================================================
    /// Directory holding persona markdown files, relative to the workspace root.
    #[serde(default = "default_personas_dir")]
    pub personas_dir: String,

    /// Glob patterns (matched against file names) selecting persona files.
    #[serde(default = "default_persona_patterns")]
    pub persona_patterns: Vec<String>,

    /// Glob patterns for files in the personas directory that are not personas.
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    // =========================================================================
    // Session journal
    // =========================================================================
    /// NDJSON session journal, relative to the workspace root.
    #[serde(default = "default_journal")]
    pub journal: String,

    /// Minutes after which a journal lock is reported as stale.
    #[serde(default = "default_lock_stale_minutes")]
    pub lock_stale_minutes: u32,

    // =========================================================================
    // Descriptor defaults
    // =========================================================================
    #[serde(default)]
    pub defaults: DescriptorDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            personas_dir: default_personas_dir(),
            persona_patterns: default_persona_patterns(),
            exclude_patterns: default_exclude_patterns(),
            journal: default_journal(),
            lock_stale_minutes: default_lock_stale_minutes(),
            defaults: DescriptorDefaults::default(),
        }
    }
}
