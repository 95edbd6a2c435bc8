//! Error types for brigade.
//!
//! Uses thiserror for derive macros. Every variant is a local, recoverable
//! condition returned to the caller; nothing in the library exits or aborts.

use crate::exit_codes;
use crate::gate::GateFailure;
use crate::reporter::SessionStatus;
use thiserror::Error;

/// Main error type for brigade operations.
///
/// Each variant maps to a specific CLI exit code.
#[derive(Error, Debug)]
pub enum BrigadeError {
    /// Bad arguments, unreadable files, or unparseable documents.
    #[error("{0}")]
    UserError(String),

    /// A descriptor with the same name is already registered.
    #[error("agent '{0}' is already registered")]
    DuplicateName(String),

    /// A descriptor violates one of the data-model invariants.
    #[error("invalid descriptor '{name}': {reason}")]
    InvalidDescriptor { name: String, reason: String },

    /// No descriptor is registered under the requested name.
    #[error("agent '{0}' not found")]
    NotFound(String),

    /// The tool-usage gate rejected a run.
    #[error("Validation failed: {0}")]
    Gate(#[from] GateFailure),

    /// One or more persona files failed to register during lint.
    #[error("{0} persona file(s) failed to register")]
    LintFailed(usize),

    /// No session exists with the given identifier.
    #[error("unknown session '{0}'")]
    UnknownSession(String),

    /// The session already reached a terminal status.
    #[error("session '{session}' is already {status}")]
    AlreadyTerminal {
        session: String,
        status: SessionStatus,
    },

    /// Progress percentage outside `0..=100`.
    #[error("progress must be between 0 and 100, got {0}")]
    InvalidProgress(u32),

    /// The session journal lock could not be acquired.
    #[error("Lock acquisition failed: {0}")]
    LockError(String),
}

impl BrigadeError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            BrigadeError::UserError(_)
            | BrigadeError::DuplicateName(_)
            | BrigadeError::InvalidDescriptor { .. }
            | BrigadeError::NotFound(_) => exit_codes::USER_ERROR,
            BrigadeError::Gate(_) | BrigadeError::LintFailed(_) => {
                exit_codes::VALIDATION_FAILURE
            }
            BrigadeError::UnknownSession(_)
            | BrigadeError::AlreadyTerminal { .. }
            | BrigadeError::InvalidProgress(_) => exit_codes::SESSION_FAILURE,
            BrigadeError::LockError(_) => exit_codes::LOCK_FAILURE,
        }
    }

    pub(crate) fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        BrigadeError::InvalidDescriptor {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for brigade operations.
pub type Result<T> = std::result::Result<T, BrigadeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_errors_are_user_errors() {
        assert_eq!(
            BrigadeError::DuplicateName("planner".into()).exit_code(),
            exit_codes::USER_ERROR
        );
        assert_eq!(
            BrigadeError::NotFound("planner".into()).exit_code(),
            exit_codes::USER_ERROR
        );
        assert_eq!(
            BrigadeError::invalid("planner", "timeout_seconds must be greater than 0").exit_code(),
            exit_codes::USER_ERROR
        );
    }

    #[test]
    fn gate_error_has_validation_exit_code() {
        let err: BrigadeError = GateFailure::InsufficientToolUsage {
            used: 1,
            minimum: 2,
        }
        .into();
        assert_eq!(err.exit_code(), exit_codes::VALIDATION_FAILURE);
        assert_eq!(
            err.to_string(),
            "Validation failed: Used 1 tools, minimum 2 required"
        );
    }

    #[test]
    fn lint_failure_has_validation_exit_code() {
        let err = BrigadeError::LintFailed(2);
        assert_eq!(err.exit_code(), exit_codes::VALIDATION_FAILURE);
        assert_eq!(err.to_string(), "2 persona file(s) failed to register");
    }

    #[test]
    fn session_errors_have_session_exit_code() {
        let err = BrigadeError::AlreadyTerminal {
            session: "abc".into(),
            status: SessionStatus::Completed,
        };
        assert_eq!(err.exit_code(), exit_codes::SESSION_FAILURE);
        assert_eq!(err.to_string(), "session 'abc' is already completed");

        assert_eq!(
            BrigadeError::UnknownSession("abc".into()).exit_code(),
            exit_codes::SESSION_FAILURE
        );
        assert_eq!(
            BrigadeError::InvalidProgress(101).exit_code(),
            exit_codes::SESSION_FAILURE
        );
    }

    #[test]
    fn lock_error_has_correct_exit_code() {
        let err = BrigadeError::LockError("journal locked".to_string());
        assert_eq!(err.exit_code(), exit_codes::LOCK_FAILURE);
    }

    #[test]
    fn invalid_descriptor_message_names_the_agent() {
        let err = BrigadeError::invalid("db-migration", "required tool 'Bash' is not allowed");
        assert_eq!(
            err.to_string(),
            "invalid descriptor 'db-migration': required tool 'Bash' is not allowed"
        );
    }
}
