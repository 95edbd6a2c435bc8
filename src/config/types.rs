//! Configuration types and defaults for brigade.
//!
//! This module defines the descriptor defaults section and the default value
//! functions used by the Config struct.

use crate::descriptor::{ModelTier, Priority};
use serde::{Deserialize, Serialize};

/// Default execution deadline for an agent run, in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 600;

/// Default retry budget.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Values applied to persona files that omit a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptorDefaults {
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub min_tools_used: usize,
    pub priority: Priority,
    pub max_parallel: u32,
    pub model: ModelTier,
}

impl Default for DescriptorDefaults {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            max_retries: DEFAULT_MAX_RETRIES,
            min_tools_used: 1,
            priority: Priority::Medium,
            max_parallel: 1,
            model: ModelTier::Inherit,
        }
    }
}

pub(super) fn default_personas_dir() -> String {
    "agents".to_string()
}

pub fn default_persona_patterns() -> Vec<String> {
    vec!["*.md".to_string()]
}

pub fn default_exclude_patterns() -> Vec<String> {
    vec!["README.md".to_string()]
}

pub(super) fn default_journal() -> String {
    ".brigade/sessions.ndjson".to_string()
}

pub(super) fn default_lock_stale_minutes() -> u32 {
    30
}
