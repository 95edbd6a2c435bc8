//! Exit code constants for the brigade CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, missing or invalid persona, duplicate name)
//! - 2: Validation failure (tool-usage gate or persona lint)
//! - 3: Session state error (unknown session, terminal session, bad progress)
//! - 4: Lock acquisition failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unknown agent, or an invalid descriptor.
pub const USER_ERROR: i32 = 1;

/// Validation failure: the tool-usage gate rejected a run, or lint found bad personas.
pub const VALIDATION_FAILURE: i32 = 2;

/// Session state error: the requested transition is not allowed.
pub const SESSION_FAILURE: i32 = 3;

/// Lock acquisition failure: the session journal is held by another process.
pub const LOCK_FAILURE: i32 = 4;
