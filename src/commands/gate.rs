//! Implementation of the `brigade gate` command.
//!
//! Checks the tools a finished run used against its agent's contract. With
//! `--session` the outcome also finishes that session: `completed` on pass,
//! `failed` with the gate's reason on failure.

use super::{load_registry, open_journal, parse_session_id, warn_skipped};
use crate::cli::GateArgs;
use crate::config::Config;
use crate::context::{WorkspaceContext, require_workspace};
use crate::descriptor::AgentDescriptor;
use crate::error::{BrigadeError, Result};
use crate::gate::{self, GatePass};
use crate::reporter::{SessionId, SessionStatus};
use crate::tool::ToolSet;

/// Execute the `brigade gate` command.
///
/// Exits 0 on pass and 2 on failure; the reason is printed either way.
pub fn cmd_gate(args: GateArgs) -> Result<()> {
    let ctx = require_workspace()?;
    let config = ctx.load_config()?;
    run_gate(&ctx, &config, &args).map(|_| ())
}

pub(crate) fn run_gate(ctx: &WorkspaceContext, config: &Config, args: &GateArgs) -> Result<GatePass> {
    let (registry, report) = load_registry(ctx, config)?;
    warn_skipped(&report);
    let descriptor = registry.get(&args.agent)?;

    let tools_used = ToolSet::parse(&args.tools)
        .map_err(|e| BrigadeError::UserError(format!("{} in --tools", e)))?;

    let session = args
        .session
        .as_deref()
        .map(parse_session_id)
        .transpose()?;

    let outcome = gate::validate(descriptor, &tools_used);

    if let Some(id) = session {
        let (status, result) = match &outcome {
            Ok(pass) => (SessionStatus::Completed, pass.message()),
            Err(failure) => (SessionStatus::Failed, failure.to_string()),
        };
        finish_session(ctx, config, id, descriptor, status, result)?;
    }

    match outcome {
        Ok(pass) => {
            println!("PASS {}: {}", descriptor.name, pass.message());
            if !pass.unlisted.is_empty() {
                println!("Note: tools outside the allowlist were used: {}", pass.unlisted);
            }
            Ok(pass)
        }
        Err(failure) => {
            println!("FAIL {}: {}", descriptor.name, failure);
            if let Some(attempt) = args.attempt {
                print_retry_hint(descriptor, attempt);
            }
            Err(failure.into())
        }
    }
}

fn finish_session(
    ctx: &WorkspaceContext,
    config: &Config,
    id: SessionId,
    descriptor: &AgentDescriptor,
    status: SessionStatus,
    result: String,
) -> Result<()> {
    let (_lock, reporter) = open_journal(ctx, config, "gate")?;

    let record = reporter.get_session(id)?;
    if record.agent != descriptor.name {
        return Err(BrigadeError::UserError(format!(
            "session '{}' belongs to agent '{}', not '{}'",
            id, record.agent, descriptor.name
        )));
    }

    reporter.finish(id, status, Some(result))?;
    println!("Session {} marked {}", id, status);
    Ok(())
}

fn print_retry_hint(descriptor: &AgentDescriptor, attempt: u32) {
    println!("{}", retry_hint(descriptor, attempt));
}

fn retry_hint(descriptor: &AgentDescriptor, attempt: u32) -> String {
    let total = descriptor.max_retries.saturating_add(1);
    let next = attempt.saturating_add(1);
    if descriptor.attempt_allowed(next) {
        format!("Retry allowed: attempt {} of {}", next, total)
    } else {
        format!("No retries left: {} attempt(s) allowed", total)
    }
}
