//! Journal locking for brigade.
//!
//! Several agents may report status at the same time through separate CLI
//! processes. Writers to the session journal serialize on a single lock file
//! (`.brigade/locks/journal.lock`) created with **create_new** semantics, so
//! only one process can hold it at a time.
//!
//! The lock file contains JSON metadata (`owner`, `pid`, `created_at`,
//! `action`) so a stuck lock can be attributed and, when stale, cleared with
//! `brigade lock clear --force`.
//!
//! A [`JournalLock`] deletes the file when dropped. A failed delete is logged.

mod operations;

#[cfg(test)]
mod tests;

pub use operations::{
    HeldLock, JournalLock, LockHolder, acquire_journal_lock, clear_journal_lock,
    journal_lock_info,
};
