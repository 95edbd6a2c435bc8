//! Loading a registry from a directory of persona files.

use super::Registry;
use crate::config::Config;
use crate::descriptor::{AgentDescriptor, PersonaFile};
use crate::error::{BrigadeError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A persona file that could not be registered.
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: BrigadeError,
}

/// A persona file that registered but has something worth pointing out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of [`Registry::load_dir`].
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Persona files considered, in visit order.
    pub scanned: Vec<PathBuf>,
    pub failures: Vec<LoadFailure>,
    pub warnings: Vec<LoadWarning>,
}

impl LoadReport {
    /// True if every scanned file registered.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl Registry {
    /// Build a registry from every persona file in `dir`.
    ///
    /// A file is a persona if its file name matches `config.persona_patterns`
    /// and none of `config.exclude_patterns`. Files are visited in sorted
    /// order, so when two files declare the same name the first one wins and
    /// the second is reported as a `DuplicateName` failure. A file that fails
    /// to parse or validate is recorded in the report and never stops the
    /// rest of the scan.
    ///
    /// # Errors
    ///
    /// Only directory-level problems (missing or unreadable `dir`, bad globs)
    /// are returned as errors.
    pub fn load_dir<P: AsRef<Path>>(dir: P, config: &Config) -> Result<(Registry, LoadReport)> {
        let dir = dir.as_ref();
        let paths = persona_paths(dir, config)?;

        let mut registry = Registry::new();
        let mut report = LoadReport::default();

        for path in paths {
            match load_one(&path, config) {
                Ok((descriptor, unknown)) => {
                    let name = descriptor.name.clone();
                    match registry.register(descriptor) {
                        Ok(()) => {
                            if !unknown.is_empty() {
                                report.warnings.push(LoadWarning {
                                    path: path.clone(),
                                    message: format!(
                                        "agent '{}' has unrecognized frontmatter keys: {}",
                                        name,
                                        unknown.join(", ")
                                    ),
                                });
                            }
                        }
                        Err(error) => {
                            tracing::warn!(path = %path.display(), %error, "skipping persona file");
                            report.failures.push(LoadFailure {
                                path: path.clone(),
                                error,
                            });
                        }
                    }
                }
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "skipping persona file");
                    report.failures.push(LoadFailure {
                        path: path.clone(),
                        error,
                    });
                }
            }
            report.scanned.push(path);
        }

        tracing::debug!(
            dir = %dir.display(),
            loaded = registry.len(),
            failed = report.failures.len(),
            "loaded personas"
        );

        Ok((registry, report))
    }
}

fn load_one(path: &Path, config: &Config) -> Result<(AgentDescriptor, Vec<String>)> {
    let persona = PersonaFile::load(path)?;
    let unknown = persona
        .unknown_keys()
        .into_iter()
        .map(str::to_string)
        .collect();
    let descriptor = AgentDescriptor::from_persona(&persona, &config.defaults)?;
    Ok((descriptor, unknown))
}

/// Persona files directly inside `dir`, sorted by path.
fn persona_paths(dir: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(BrigadeError::UserError(format!(
            "personas directory '{}' does not exist",
            dir.display()
        )));
    }

    let (include, exclude) = config.persona_globs()?;

    let entries = fs::read_dir(dir).map_err(|e| {
        BrigadeError::UserError(format!(
            "failed to read personas directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            BrigadeError::UserError(format!("failed to read directory entry: {}", e))
        })?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(file_name) = path.file_name() else {
            continue;
        };
        if include.is_match(file_name) && !exclude.is_match(file_name) {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}
