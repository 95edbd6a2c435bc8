//! Session status and progress reporting.
//!
//! A [`Reporter`] tracks execution sessions through the state machine
//! `running -> {completed, failed}`. Every accepted call appends one
//! [`SessionEvent`] to that session's stream; calls against a finished
//! session are rejected with `AlreadyTerminal` rather than ignored.
//!
//! The reporter is an ordinary owned value. Share it between threads with
//! `Arc<Reporter>`: writes to one session are totally ordered, while
//! distinct sessions only contend on the index lock for lookups.
//!
//! With a journal attached ([`Reporter::with_journal`]) each event is
//! appended to an NDJSON file before the in-memory state changes, and
//! [`Reporter::replay`] rebuilds every session from that file.

mod journal;
mod session;

pub use journal::{Journal, read_events};
pub use session::{EventKind, SessionEvent, SessionId, SessionRecord, SessionStatus};

use crate::error::{BrigadeError, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// Highest accepted progress percentage.
pub const MAX_PROGRESS: u32 = 100;

#[derive(Debug)]
struct SessionState {
    record: SessionRecord,
    events: Vec<SessionEvent>,
    /// Creation order across the reporter, for newest-first listing.
    ordinal: u64,
}

impl SessionState {
    fn from_started(event: SessionEvent, ordinal: u64) -> Result<Self> {
        let EventKind::Started { agent, task } = &event.kind else {
            return Err(BrigadeError::UserError(format!(
                "session '{}' has no started event",
                event.session
            )));
        };

        let record = SessionRecord {
            id: event.session,
            agent: agent.clone(),
            task: task.clone(),
            status: SessionStatus::Running,
            progress: None,
            result: None,
            started_at: event.ts,
            updated_at: event.ts,
            finished_at: None,
        };

        Ok(Self {
            record,
            events: vec![event],
            ordinal,
        })
    }

    fn next_seq(&self) -> u64 {
        self.events.len() as u64 + 1
    }

    /// Reject `kind` if it is not a legal next step for this session.
    fn check(&self, kind: &EventKind) -> Result<()> {
        match kind {
            EventKind::Started { .. } => Err(BrigadeError::UserError(format!(
                "session '{}' was already started",
                self.record.id
            ))),
            EventKind::Progress { percentage } => {
                if *percentage > MAX_PROGRESS {
                    return Err(BrigadeError::InvalidProgress(*percentage));
                }
                self.check_running()
            }
            EventKind::Finished { status, .. } => {
                if !status.is_terminal() {
                    return Err(BrigadeError::UserError(format!(
                        "session '{}' must finish as completed or failed, not {}",
                        self.record.id, status
                    )));
                }
                self.check_running()
            }
        }
    }

    fn check_running(&self) -> Result<()> {
        if self.record.status.is_terminal() {
            return Err(BrigadeError::AlreadyTerminal {
                session: self.record.id.to_string(),
                status: self.record.status,
            });
        }
        Ok(())
    }

    /// Fold an already-checked event into the record.
    fn apply(&mut self, event: SessionEvent) {
        self.record.updated_at = event.ts;
        match &event.kind {
            EventKind::Started { .. } => {}
            EventKind::Progress { percentage } => {
                self.record.progress = Some(*percentage);
            }
            EventKind::Finished { status, result } => {
                self.record.status = *status;
                self.record.result = result.clone();
                self.record.finished_at = Some(event.ts);
            }
        }
        self.events.push(event);
    }
}

/// Tracks sessions and their event streams.
#[derive(Debug, Default)]
pub struct Reporter {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<SessionState>>>>,
    next_ordinal: AtomicU64,
    journal: Option<Journal>,
}

impl Reporter {
    /// An in-memory reporter with no journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a reporter from the journal at `path`, then keep appending to it.
    ///
    /// A missing journal file is created empty.
    pub fn with_journal<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reporter = Self::replay(path)?;
        reporter.journal = Some(Journal::open(path)?);
        Ok(reporter)
    }

    /// Rebuild every session recorded in the journal at `path`.
    ///
    /// The returned reporter does not write back to the journal. Replay fails
    /// if the file is unreadable or if any session's stream breaks the state
    /// machine (events after a terminal one, gaps in `seq`, progress out of
    /// range, a session without a `started` event).
    pub fn replay<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let events = read_events(path)?;
        let count = events.len();

        let reporter = Self::new();
        for event in events {
            let (session, seq) = (event.session, event.seq);
            reporter.restore(event).map_err(|e| {
                BrigadeError::UserError(format!(
                    "failed to replay journal '{}' (session {}, seq {}): {}",
                    path.display(),
                    session,
                    seq,
                    e
                ))
            })?;
        }

        tracing::debug!(path = %path.display(), events = count, "replayed session journal");
        Ok(reporter)
    }

    fn restore(&self, event: SessionEvent) -> Result<()> {
        if let EventKind::Started { .. } = event.kind {
            if event.seq != 1 {
                return Err(BrigadeError::UserError(format!(
                    "started event must have seq 1, got {}",
                    event.seq
                )));
            }
            let mut sessions = self.write_index();
            if sessions.contains_key(&event.session) {
                return Err(BrigadeError::UserError(
                    "session was started twice".to_string(),
                ));
            }
            let id = event.session;
            let state = SessionState::from_started(event, self.ordinal())?;
            sessions.insert(id, Arc::new(Mutex::new(state)));
            return Ok(());
        }

        let slot = self.slot(event.session)?;
        let mut state = lock(&slot);
        let expected = state.next_seq();
        if event.seq != expected {
            return Err(BrigadeError::UserError(format!(
                "expected seq {}, got {}",
                expected, event.seq
            )));
        }
        state.check(&event.kind)?;
        state.apply(event);
        Ok(())
    }

    /// Start a new session in `running` state.
    pub fn start_session(&self, agent: &str, task: &str) -> Result<SessionId> {
        let id = SessionId::generate();
        let event = SessionEvent {
            ts: Utc::now(),
            session: id,
            seq: 1,
            kind: EventKind::Started {
                agent: agent.to_string(),
                task: task.to_string(),
            },
        };

        self.journal(&event)?;
        let state = SessionState::from_started(event, self.ordinal())?;
        self.write_index().insert(id, Arc::new(Mutex::new(state)));

        tracing::info!(session = %id, agent, "session started");
        Ok(id)
    }

    /// Record the latest progress percentage for a running session.
    ///
    /// # Errors
    ///
    /// * `UnknownSession` - no session with this id
    /// * `InvalidProgress` - `percentage` above 100
    /// * `AlreadyTerminal` - the session already finished
    pub fn report_progress(&self, id: SessionId, percentage: u32) -> Result<()> {
        self.record(id, EventKind::Progress { percentage })?;
        tracing::debug!(session = %id, percentage, "session progress");
        Ok(())
    }

    /// Move a running session to `completed` or `failed`.
    ///
    /// A second finish on the same session fails with `AlreadyTerminal`.
    pub fn finish(&self, id: SessionId, status: SessionStatus, result: Option<String>) -> Result<()> {
        self.record(id, EventKind::Finished { status, result })?;
        tracing::info!(session = %id, %status, "session finished");
        Ok(())
    }

    /// Check, journal, then apply one event while holding the session's lock.
    fn record(&self, id: SessionId, kind: EventKind) -> Result<()> {
        let slot = self.slot(id)?;
        let mut state = lock(&slot);
        state.check(&kind)?;

        let event = SessionEvent {
            ts: Utc::now(),
            session: id,
            seq: state.next_seq(),
            kind,
        };
        self.journal(&event)?;
        state.apply(event);
        Ok(())
    }

    /// Snapshot of one session.
    pub fn get_session(&self, id: SessionId) -> Result<SessionRecord> {
        let slot = self.slot(id)?;
        let state = lock(&slot);
        Ok(state.record.clone())
    }

    /// A session's event stream, in order.
    pub fn events(&self, id: SessionId) -> Result<Vec<SessionEvent>> {
        let slot = self.slot(id)?;
        let state = lock(&slot);
        Ok(state.events.clone())
    }

    /// All sessions, newest first, optionally restricted to one status.
    pub fn sessions(&self, status: Option<SessionStatus>) -> Vec<SessionRecord> {
        let slots: Vec<_> = self.read_index().values().cloned().collect();

        let mut found: Vec<(u64, SessionRecord)> = slots
            .iter()
            .map(|slot| {
                let state = lock(slot);
                (state.ordinal, state.record.clone())
            })
            .filter(|(_, record)| status.is_none_or(|s| record.status == s))
            .collect();

        found.sort_by(|a, b| b.0.cmp(&a.0));
        found.into_iter().map(|(_, record)| record).collect()
    }

    pub fn len(&self) -> usize {
        self.read_index().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_index().is_empty()
    }

    /// Path of the attached journal, if any.
    pub fn journal_path(&self) -> Option<&Path> {
        self.journal.as_ref().map(Journal::path)
    }

    fn journal(&self, event: &SessionEvent) -> Result<()> {
        match &self.journal {
            Some(journal) => journal.append(event),
            None => Ok(()),
        }
    }

    fn slot(&self, id: SessionId) -> Result<Arc<Mutex<SessionState>>> {
        self.read_index()
            .get(&id)
            .cloned()
            .ok_or_else(|| BrigadeError::UnknownSession(id.to_string()))
    }

    fn ordinal(&self) -> u64 {
        self.next_ordinal.fetch_add(1, Ordering::Relaxed)
    }

    fn read_index(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<SessionId, Arc<Mutex<SessionState>>>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_index(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<SessionId, Arc<Mutex<SessionState>>>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn lock(slot: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
