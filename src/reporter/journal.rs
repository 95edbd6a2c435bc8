//! Append-only NDJSON session journal.
//!
//! Each accepted reporter event becomes one JSON object on its own line.
//! Appends are synced to disk before the in-memory state changes, so a
//! journal never lags behind what callers were told succeeded.

use super::session::SessionEvent;
use crate::error::{BrigadeError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Open handle on a journal file.
#[derive(Debug)]
pub struct Journal {
    path: PathBuf,
    file: Mutex<File>,
}

impl Journal {
    /// Open `path` for appending, creating it and its parent directory if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                BrigadeError::UserError(format!(
                    "failed to create journal directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                BrigadeError::UserError(format!(
                    "failed to open journal '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event as a single line and sync it.
    pub fn append(&self, event: &SessionEvent) -> Result<()> {
        let mut line = serde_json::to_vec(event).map_err(|e| {
            BrigadeError::UserError(format!("failed to serialize session event: {}", e))
        })?;
        line.push(b'\n');

        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);

        // Body and newline go out in a single write.
        file.write_all(&line).map_err(|e| {
            BrigadeError::UserError(format!(
                "failed to write to journal '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        file.sync_all().map_err(|e| {
            BrigadeError::UserError(format!(
                "failed to sync journal '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

/// Read every event from a journal file, in file order.
///
/// A missing file reads as an empty journal. Blank lines are skipped.
pub fn read_events<P: AsRef<Path>>(path: P) -> Result<Vec<SessionEvent>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path).map_err(|e| {
        BrigadeError::UserError(format!(
            "failed to open journal '{}': {}",
            path.display(),
            e
        ))
    })?;

    let mut events = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| {
            BrigadeError::UserError(format!(
                "failed to read journal '{}': {}",
                path.display(),
                e
            ))
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let event: SessionEvent = serde_json::from_str(&line).map_err(|e| {
            BrigadeError::UserError(format!(
                "corrupt journal '{}' at line {}: {}",
                path.display(),
                index + 1,
                e
            ))
        })?;
        events.push(event);
    }

    Ok(events)
}
