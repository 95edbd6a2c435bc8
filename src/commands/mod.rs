//! Command implementations for brigade.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the workspace plumbing they share: loading the
//! registry from the personas directory and opening the session journal.

mod agents;
mod gate;
mod init;
mod lock;
mod session;

use crate::cli::{
    AgentsAction, AgentsCommand, Command, LockAction, LockCommand, SessionAction, SessionCommand,
};
use crate::config::Config;
use crate::context::WorkspaceContext;
use crate::error::{BrigadeError, Result};
use crate::locks::{self, JournalLock};
use crate::registry::{LoadReport, Registry};
use crate::reporter::{Reporter, SessionId};
use std::time::Duration;

/// How long a journal writer waits for another process to release the lock.
const JOURNAL_LOCK_WAIT: Duration = Duration::from_secs(5);

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Init => init::cmd_init(),
        Command::Agents(agents_cmd) => dispatch_agents(agents_cmd),
        Command::Gate(args) => gate::cmd_gate(args),
        Command::Session(session_cmd) => dispatch_session(session_cmd),
        Command::Lock(lock_cmd) => dispatch_lock(lock_cmd),
    }
}

fn dispatch_agents(agents_cmd: AgentsCommand) -> Result<()> {
    match agents_cmd.action {
        AgentsAction::List => agents::cmd_agents_list(),
        AgentsAction::Show(args) => agents::cmd_agents_show(args),
        AgentsAction::Lint => agents::cmd_agents_lint(),
    }
}

fn dispatch_session(session_cmd: SessionCommand) -> Result<()> {
    match session_cmd.action {
        SessionAction::Start(args) => session::cmd_session_start(args),
        SessionAction::Progress(args) => session::cmd_session_progress(args),
        SessionAction::Finish(args) => session::cmd_session_finish(args),
        SessionAction::Show(args) => session::cmd_session_show(args),
        SessionAction::List(args) => session::cmd_session_list(args),
    }
}

fn dispatch_lock(lock_cmd: LockCommand) -> Result<()> {
    match lock_cmd.action {
        LockAction::List => lock::cmd_lock_list(),
        LockAction::Clear(args) => lock::cmd_lock_clear(args),
    }
}

/// Load every persona in the workspace's personas directory.
pub(crate) fn load_registry(
    ctx: &WorkspaceContext,
    config: &Config,
) -> Result<(Registry, LoadReport)> {
    Registry::load_dir(ctx.personas_dir(config), config)
}

/// Print skipped persona files to stderr.
///
/// Commands other than `agents lint` treat a bad persona as a warning so
/// one broken file does not take the whole workspace down.
pub(crate) fn warn_skipped(report: &LoadReport) {
    for failure in &report.failures {
        eprintln!(
            "Warning: skipped '{}': {}",
            failure.path.display(),
            failure.error
        );
    }
}

/// A reporter writing to the workspace journal, plus the lock that makes it exclusive.
///
/// Keep the guard alive until the last write; dropping it releases the lock.
pub(crate) fn open_journal(
    ctx: &WorkspaceContext,
    config: &Config,
    action: &str,
) -> Result<(JournalLock, Reporter)> {
    let guard = locks::acquire_journal_lock(ctx, action, JOURNAL_LOCK_WAIT)?;
    let reporter = Reporter::with_journal(ctx.journal_path(config))?;
    Ok((guard, reporter))
}

pub(crate) fn parse_session_id(raw: &str) -> Result<SessionId> {
    raw.parse()
        .map_err(|_| BrigadeError::UserError(format!("invalid session id '{}'", raw)))
}

/// A read-only view of the workspace journal.
pub(crate) fn read_journal(ctx: &WorkspaceContext, config: &Config) -> Result<Reporter> {
    Reporter::replay(ctx.journal_path(config))
}
