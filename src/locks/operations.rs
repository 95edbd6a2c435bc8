//! Journal lock file: acquisition, inspection, and forced clearing.

use crate::config::Config;
use crate::context::WorkspaceContext;
use crate::error::{BrigadeError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// Delay between attempts while waiting for a held lock.
const RETRY_INTERVAL: Duration = Duration::from_millis(25);

/// Who holds the journal lock, as written into the lock file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockHolder {
    /// `user@host` of the holding process.
    pub owner: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,

    pub created_at: DateTime<Utc>,

    /// The brigade command holding the lock (`session start`, `gate`, ...).
    pub action: String,
}

impl LockHolder {
    fn current(action: &str) -> Self {
        let user = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string());
        let host = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "unknown".to_string());

        Self {
            owner: format!("{}@{}", user, host),
            pid: Some(std::process::id()),
            created_at: Utc::now(),
            action: action.to_string(),
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BrigadeError::LockError(format!("failed to read lock '{}': {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            BrigadeError::LockError(format!(
                "lock '{}' has unreadable metadata: {}",
                path.display(),
                e
            ))
        })
    }

    /// Time since the lock was taken, e.g. `42m`, `3h 5m`, `2d 1h`.
    pub fn age(&self) -> String {
        let minutes = Utc::now()
            .signed_duration_since(self.created_at)
            .num_minutes()
            .max(0);
        match (minutes / (24 * 60), minutes / 60) {
            (0, 0) => format!("{}m", minutes),
            (0, hours) => format!("{}h {}m", hours, minutes % 60),
            (days, hours) => format!("{}d {}h", days, hours % 24),
        }
    }
}

/// Holds the journal lock until dropped.
#[derive(Debug)]
pub struct JournalLock {
    path: PathBuf,
}

impl Drop for JournalLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release journal lock");
        }
    }
}

/// The current journal lock as seen by `brigade lock`.
#[derive(Debug, Clone)]
pub struct HeldLock {
    pub path: PathBuf,
    pub holder: LockHolder,
    /// Older than `lock_stale_minutes`.
    pub is_stale: bool,
}

/// Create the lock file exclusively. `Ok(None)` means someone else holds it.
fn try_create(path: &Path, holder: &LockHolder) -> Result<Option<JournalLock>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            BrigadeError::LockError(format!(
                "failed to create locks directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => {
            return Err(BrigadeError::LockError(format!(
                "failed to create lock '{}': {}",
                path.display(),
                e
            )));
        }
    };

    // From here on the guard owns the file and removes it on any error.
    let lock = JournalLock {
        path: path.to_path_buf(),
    };
    let body = serde_json::to_vec_pretty(holder)
        .map_err(|e| BrigadeError::LockError(format!("failed to encode lock holder: {}", e)))?;
    file.write_all(&body)
        .and_then(|()| file.sync_all())
        .map_err(|e| BrigadeError::LockError(format!("failed to write lock holder: {}", e)))?;

    Ok(Some(lock))
}

/// Acquire the journal lock, waiting up to `wait` for the current holder.
///
/// Fails with [`BrigadeError::LockError`] (exit code 4) naming the holder
/// when the lock is still taken after `wait`.
pub fn acquire_journal_lock(
    ctx: &WorkspaceContext,
    action: &str,
    wait: Duration,
) -> Result<JournalLock> {
    let path = ctx.journal_lock_path();
    let holder = LockHolder::current(action);
    let deadline = Instant::now() + wait;

    loop {
        if let Some(lock) = try_create(&path, &holder)? {
            tracing::debug!(path = %path.display(), action, "acquired journal lock");
            return Ok(lock);
        }
        if Instant::now() >= deadline {
            break;
        }
        thread::sleep(RETRY_INTERVAL);
    }

    let detail = match LockHolder::read(&path) {
        Ok(other) => format!(
            "\nHeld by {} for {} (action: {})",
            other.owner,
            other.age(),
            other.action
        ),
        Err(_) => String::new(),
    };
    Err(BrigadeError::LockError(format!(
        "session journal is held by another process: {}{}",
        path.display(),
        detail
    )))
}

/// Describe the journal lock, if one is held.
pub fn journal_lock_info(ctx: &WorkspaceContext, config: &Config) -> Result<Option<HeldLock>> {
    let path = ctx.journal_lock_path();
    if !path.exists() {
        return Ok(None);
    }

    let holder = LockHolder::read(&path)?;
    let age_minutes = Utc::now()
        .signed_duration_since(holder.created_at)
        .num_minutes();
    let is_stale = age_minutes > i64::from(config.lock_stale_minutes);
    if is_stale {
        tracing::warn!(path = %path.display(), age = %holder.age(), "journal lock is stale");
    }

    Ok(Some(HeldLock {
        path,
        holder,
        is_stale,
    }))
}

/// Remove the journal lock regardless of who holds it.
pub fn clear_journal_lock(ctx: &WorkspaceContext, config: &Config) -> Result<HeldLock> {
    let Some(held) = journal_lock_info(ctx, config)? else {
        return Err(BrigadeError::UserError(format!(
            "journal lock does not exist at: {}",
            ctx.journal_lock_path().display()
        )));
    };

    fs::remove_file(&held.path).map_err(|e| {
        BrigadeError::LockError(format!(
            "failed to clear lock '{}': {}",
            held.path.display(),
            e
        ))
    })?;

    Ok(held)
}
