//! Workspace context resolution for brigade.
//!
//! A brigade workspace is any directory containing a `.brigade/` state
//! directory. Commands may be invoked from any subdirectory; the context
//! walks up from the working directory to the nearest workspace root and
//! resolves every path from there.

use crate::config::Config;
use crate::error::{BrigadeError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the state directory that marks a workspace root.
pub const STATE_DIR: &str = ".brigade";

/// Resolved paths for a brigade workspace. All paths are absolute.
#[derive(Debug, Clone)]
pub struct WorkspaceContext {
    /// Workspace root (the directory containing `.brigade/`).
    pub root: PathBuf,

    /// `{root}/.brigade/`
    pub state_dir: PathBuf,

    /// `{root}/.brigade/locks/`
    pub locks_dir: PathBuf,
}

impl WorkspaceContext {
    /// Build a context rooted at `root` without checking that it is initialized.
    pub fn at<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        let state_dir = root.join(STATE_DIR);
        let locks_dir = state_dir.join("locks");
        Self {
            root,
            state_dir,
            locks_dir,
        }
    }

    /// Resolve the workspace from the current working directory.
    pub fn resolve() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            BrigadeError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        Self::resolve_from(&cwd)
    }

    /// Resolve the workspace by walking up from `start`.
    pub fn resolve_from<P: AsRef<Path>>(start: P) -> Result<Self> {
        let start = start.as_ref();

        start
            .ancestors()
            .find(|dir| dir.join(STATE_DIR).is_dir())
            .map(Self::at)
            .ok_or_else(|| {
                BrigadeError::UserError(format!(
                    "no brigade workspace found at or above '{}'.\n\n\
                     To create one, run:\n  brigade init",
                    start.display()
                ))
            })
    }

    /// Whether `.brigade/` exists under the root.
    pub fn is_initialized(&self) -> bool {
        self.state_dir.is_dir()
    }

    /// Path to `.brigade/config.yaml`.
    pub fn config_path(&self) -> PathBuf {
        self.state_dir.join("config.yaml")
    }

    /// Load the workspace config, falling back to defaults if the file is absent.
    pub fn load_config(&self) -> Result<Config> {
        Config::load_or_default(self.config_path())
    }

    /// Absolute personas directory for `config`.
    pub fn personas_dir(&self, config: &Config) -> PathBuf {
        self.root.join(&config.personas_dir)
    }

    /// Absolute session journal path for `config`.
    pub fn journal_path(&self, config: &Config) -> PathBuf {
        self.root.join(&config.journal)
    }

    /// Path to the lock file serializing journal writers across processes.
    pub fn journal_lock_path(&self) -> PathBuf {
        self.locks_dir.join("journal.lock")
    }
}

/// Resolve the workspace from the current directory, failing if there is none.
pub fn require_workspace() -> Result<WorkspaceContext> {
    WorkspaceContext::resolve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_from_root() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(STATE_DIR)).unwrap();

        let ctx = WorkspaceContext::resolve_from(temp.path()).unwrap();
        assert_eq!(ctx.root, temp.path());
        assert_eq!(ctx.state_dir, temp.path().join(".brigade"));
        assert_eq!(ctx.locks_dir, temp.path().join(".brigade").join("locks"));
    }

    #[test]
    fn test_resolve_from_subdirectory() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(STATE_DIR)).unwrap();
        let nested = temp.path().join("agents").join("ops");
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = WorkspaceContext::resolve_from(&nested).unwrap();
        assert_eq!(ctx.root, temp.path());
    }

    #[test]
    fn test_resolve_outside_workspace_fails() {
        let temp = TempDir::new().unwrap();
        let err = WorkspaceContext::resolve_from(temp.path()).unwrap_err();
        assert!(err.to_string().contains("brigade init"));
    }

    #[test]
    fn test_paths_follow_config() {
        let ctx = WorkspaceContext::at("/work");
        let mut config = Config::default();
        config.personas_dir = "personas".to_string();
        config.journal = "state/log.ndjson".to_string();

        assert_eq!(ctx.config_path(), PathBuf::from("/work/.brigade/config.yaml"));
        assert_eq!(ctx.personas_dir(&config), PathBuf::from("/work/personas"));
        assert_eq!(ctx.journal_path(&config), PathBuf::from("/work/state/log.ndjson"));
        assert_eq!(
            ctx.journal_lock_path(),
            PathBuf::from("/work/.brigade/locks/journal.lock")
        );
    }

    #[test]
    fn test_load_config_defaults_when_missing() {
        let temp = TempDir::new().unwrap();
        let ctx = WorkspaceContext::at(temp.path());
        assert_eq!(ctx.load_config().unwrap(), Config::default());
    }
}
