//! Implementation of the `brigade session` commands.
//!
//! Each invocation replays the workspace journal; writes hold the journal
//! lock from replay through append so concurrent invocations never interleave
//! a session's events.

use super::{load_registry, open_journal, parse_session_id, read_journal};
use crate::cli::{
    SessionFinishArgs, SessionListArgs, SessionProgressArgs, SessionShowArgs, SessionStartArgs,
};
use crate::config::Config;
use crate::context::{WorkspaceContext, require_workspace};
use crate::error::Result;
use crate::reporter::{SessionId, SessionRecord};

/// Execute the `brigade session start` command.
///
/// Prints only the new session id so scripts can capture it.
pub fn cmd_session_start(args: SessionStartArgs) -> Result<()> {
    let ctx = require_workspace()?;
    let config = ctx.load_config()?;
    let id = start_session(&ctx, &config, &args)?;
    println!("{}", id);
    Ok(())
}

pub(crate) fn start_session(
    ctx: &WorkspaceContext,
    config: &Config,
    args: &SessionStartArgs,
) -> Result<SessionId> {
    let (registry, _) = load_registry(ctx, config)?;
    registry.get(&args.agent)?;

    let (_lock, reporter) = open_journal(ctx, config, "session start")?;
    reporter.start_session(&args.agent, &args.task)
}

/// Execute the `brigade session progress` command.
pub fn cmd_session_progress(args: SessionProgressArgs) -> Result<()> {
    let ctx = require_workspace()?;
    let config = ctx.load_config()?;
    report_progress(&ctx, &config, &args)?;
    println!("Session {}: {}%", args.id, args.percentage);
    Ok(())
}

pub(crate) fn report_progress(
    ctx: &WorkspaceContext,
    config: &Config,
    args: &SessionProgressArgs,
) -> Result<()> {
    let id = parse_session_id(&args.id)?;
    let (_lock, reporter) = open_journal(ctx, config, "session progress")?;
    reporter.report_progress(id, args.percentage)
}

/// Execute the `brigade session finish` command.
pub fn cmd_session_finish(args: SessionFinishArgs) -> Result<()> {
    let ctx = require_workspace()?;
    let config = ctx.load_config()?;
    finish_session(&ctx, &config, &args)?;
    println!("Session {} {}", args.id, args.status);
    Ok(())
}

pub(crate) fn finish_session(
    ctx: &WorkspaceContext,
    config: &Config,
    args: &SessionFinishArgs,
) -> Result<()> {
    let id = parse_session_id(&args.id)?;
    let (_lock, reporter) = open_journal(ctx, config, "session finish")?;
    reporter.finish(id, args.status, args.result.clone())
}

/// Execute the `brigade session show` command.
pub fn cmd_session_show(args: SessionShowArgs) -> Result<()> {
    let ctx = require_workspace()?;
    let config = ctx.load_config()?;
    let id = parse_session_id(&args.id)?;

    let reporter = read_journal(&ctx, &config)?;
    let record = reporter.get_session(id)?;
    let events = reporter.events(id)?;

    print!("{}", render_record(&record));
    println!();
    println!("Events:");
    for event in &events {
        println!("  {}", event);
    }

    Ok(())
}

/// Execute the `brigade session list` command.
pub fn cmd_session_list(args: SessionListArgs) -> Result<()> {
    let ctx = require_workspace()?;
    let config = ctx.load_config()?;

    let reporter = read_journal(&ctx, &config)?;
    let sessions = reporter.sessions(args.status);

    if sessions.is_empty() {
        println!("No sessions.");
        return Ok(());
    }

    print!("{}", render_list(&sessions));
    Ok(())
}

pub(crate) fn render_record(record: &SessionRecord) -> String {
    let mut lines = vec![
        format!("Session:   {}", record.id),
        format!("Agent:     {}", record.agent),
        format!("Task:      {}", record.task),
        format!("Status:    {}", record.status),
    ];
    if let Some(progress) = record.progress {
        lines.push(format!("Progress:  {}%", progress));
    }
    lines.push(format!(
        "Started:   {}",
        record.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(finished) = record.finished_at {
        lines.push(format!(
            "Finished:  {}",
            finished.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    if let Some(result) = &record.result {
        lines.push(format!("Result:    {}", result));
    }
    lines.join("\n") + "\n"
}

pub(crate) fn render_list(sessions: &[SessionRecord]) -> String {
    sessions
        .iter()
        .map(|record| {
            let progress = record
                .progress
                .map(|p| format!("{}%", p))
                .unwrap_or_else(|| "-".to_string());
            format!(
                "{}  {:<9}  {:>4}  {}  {}\n",
                record.id,
                record.status.as_str(),
                progress,
                record.agent,
                record.task
            )
        })
        .collect()
}
