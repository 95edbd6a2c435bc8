//! Session records and the events that drive them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle status of a session.
///
/// `running` is the only non-terminal state; `completed` and `failed` are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Running,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Running => "running",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::Running)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "running" => Ok(SessionStatus::Running),
            "completed" => Ok(SessionStatus::Completed),
            "failed" => Ok(SessionStatus::Failed),
            other => Err(format!(
                "unknown session status '{}' (expected running, completed, or failed)",
                other
            )),
        }
    }
}

/// Opaque session identifier (a random UUID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub(crate) fn generate() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(SessionId)
    }
}

/// Snapshot of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub agent: String,
    pub task: String,
    pub status: SessionStatus,
    /// Last reported percentage, if any progress was reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u32>,
    /// Free-text outcome supplied on finish.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

/// What happened to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    Started {
        agent: String,
        task: String,
    },
    Progress {
        percentage: u32,
    },
    Finished {
        status: SessionStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<String>,
    },
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Started { .. } => "started",
            EventKind::Progress { .. } => "progress",
            EventKind::Finished { .. } => "finished",
        }
    }
}

/// One entry in a session's totally ordered event stream.
///
/// Serialized as a single JSON object per journal line, e.g.
/// `{"ts":"...","session":"...","seq":2,"kind":"progress","percentage":40}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEvent {
    pub ts: DateTime<Utc>,
    pub session: SessionId,
    /// 1-based position within the session's stream.
    pub seq: u64,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ts = self.ts.format("%Y-%m-%d %H:%M:%S");
        match &self.kind {
            EventKind::Started { agent, task } => {
                write!(f, "#{} {} started: {} ({})", self.seq, ts, agent, task)
            }
            EventKind::Progress { percentage } => {
                write!(f, "#{} {} progress: {}%", self.seq, ts, percentage)
            }
            EventKind::Finished { status, result } => {
                write!(f, "#{} {} {}", self.seq, ts, status)?;
                if let Some(result) = result {
                    write!(f, ": {}", result)?;
                }
                Ok(())
            }
        }
    }
}
