//! Config loading, validation, and utility operations.

use super::model::Config;
use crate::error::{BrigadeError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            BrigadeError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config if the file exists, otherwise return defaults.
    ///
    /// A file that exists but fails to parse or validate is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| {
                BrigadeError::UserError(format!("failed to parse config YAML: {}", e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            BrigadeError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Atomically write the config to disk.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        crate::fs::atomic_write_file(path, &self.to_yaml()?)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `personas_dir` and `journal` must be non-empty
    /// - `persona_patterns` must be non-empty
    /// - all glob patterns must compile
    /// - `lock_stale_minutes` must be positive
    /// - `defaults.timeout_seconds` and `defaults.max_parallel` must be positive
    pub fn validate(&self) -> Result<()> {
        if self.personas_dir.trim().is_empty() {
            return Err(BrigadeError::UserError(
                "config validation failed: personas_dir must not be empty".to_string(),
            ));
        }

        if self.journal.trim().is_empty() {
            return Err(BrigadeError::UserError(
                "config validation failed: journal must not be empty".to_string(),
            ));
        }

        if self.persona_patterns.is_empty() {
            return Err(BrigadeError::UserError(
                "config validation failed: persona_patterns must list at least one pattern"
                    .to_string(),
            ));
        }

        if self.lock_stale_minutes == 0 {
            return Err(BrigadeError::UserError(
                "config validation failed: lock_stale_minutes must be greater than 0".to_string(),
            ));
        }

        if self.defaults.timeout_seconds == 0 {
            return Err(BrigadeError::UserError(
                "config validation failed: defaults.timeout_seconds must be greater than 0"
                    .to_string(),
            ));
        }

        if self.defaults.max_parallel == 0 {
            return Err(BrigadeError::UserError(
                "config validation failed: defaults.max_parallel must be greater than 0"
                    .to_string(),
            ));
        }

        build_globset("persona_patterns", &self.persona_patterns)?;
        build_globset("exclude_patterns", &self.exclude_patterns)?;

        Ok(())
    }

    /// Compiled `(include, exclude)` glob sets for persona discovery.
    pub fn persona_globs(&self) -> Result<(GlobSet, GlobSet)> {
        Ok((
            build_globset("persona_patterns", &self.persona_patterns)?,
            build_globset("exclude_patterns", &self.exclude_patterns)?,
        ))
    }
}

fn build_globset(field: &str, patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| {
            BrigadeError::UserError(format!(
                "config validation failed: invalid glob '{}' in {}: {}",
                pattern, field, e
            ))
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| {
        BrigadeError::UserError(format!(
            "config validation failed: failed to build {}: {}",
            field, e
        ))
    })
}
