//! Implementation of the `brigade agents` commands.
//!
//! - `agents list` - table of registered agents
//! - `agents show` - one agent's full descriptor
//! - `agents lint` - report every persona file that fails to register

use super::{load_registry, warn_skipped};
use crate::cli::AgentShowArgs;
use crate::context::require_workspace;
use crate::descriptor::AgentDescriptor;
use crate::error::{BrigadeError, Result};
use crate::registry::{LoadReport, Registry};

/// Execute the `brigade agents list` command.
pub fn cmd_agents_list() -> Result<()> {
    let ctx = require_workspace()?;
    let config = ctx.load_config()?;
    let (registry, report) = load_registry(&ctx, &config)?;
    warn_skipped(&report);

    if registry.is_empty() {
        println!(
            "No agents registered in {}.",
            ctx.personas_dir(&config).display()
        );
        return Ok(());
    }

    print!("{}", render_table(&registry));
    Ok(())
}

/// Execute the `brigade agents show` command.
pub fn cmd_agents_show(args: AgentShowArgs) -> Result<()> {
    let ctx = require_workspace()?;
    let config = ctx.load_config()?;
    let (registry, report) = load_registry(&ctx, &config)?;
    warn_skipped(&report);

    let descriptor = registry.get(&args.name)?;

    if args.json {
        let json = serde_json::to_string_pretty(descriptor).map_err(|e| {
            BrigadeError::UserError(format!("failed to serialize descriptor: {}", e))
        })?;
        println!("{}", json);
    } else {
        print!("{}", render_descriptor(descriptor));
    }

    Ok(())
}

/// Execute the `brigade agents lint` command.
///
/// Exits with code 2 when any persona file fails to register.
pub fn cmd_agents_lint() -> Result<()> {
    let ctx = require_workspace()?;
    let config = ctx.load_config()?;
    let (registry, report) = load_registry(&ctx, &config)?;

    print!("{}", render_lint(&registry, &report));

    if report.is_clean() {
        Ok(())
    } else {
        Err(BrigadeError::LintFailed(report.failures.len()))
    }
}

pub(crate) fn render_table(registry: &Registry) -> String {
    let name_width = registry
        .names()
        .iter()
        .map(|n| n.len())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    let mut out = format!(
        "{:<name_width$}  {:<9}  {:>3}  {:>7}  {:<8}  TOOLS\n",
        "NAME", "MODEL", "MIN", "TIMEOUT", "PRIORITY"
    );
    for d in registry.iter() {
        out += &format!(
            "{:<name_width$}  {:<9}  {:>3}  {:>6}s  {:<8}  {}\n",
            d.name,
            d.model.primary.as_str(),
            d.min_tools_used,
            d.timeout_seconds,
            d.orchestration.priority.as_str(),
            d.allowed_tools
        );
    }
    out
}

pub(crate) fn render_descriptor(d: &AgentDescriptor) -> String {
    let mut lines = vec![format!("Name:           {}", d.name)];
    if !d.trigger_description.is_empty() {
        lines.push(format!("Description:    {}", d.trigger_description));
    }

    let model = match &d.model.fallback {
        Some(fallback) => {
            let triggers: Vec<String> = fallback.on.iter().map(|t| t.to_string()).collect();
            format!(
                "{} (fallback: {} on {})",
                d.model.primary,
                fallback.model,
                triggers.join(", ")
            )
        }
        None => d.model.primary.to_string(),
    };
    lines.push(format!("Model:          {}", model));

    lines.push(format!("Timeout:        {}s", d.timeout_seconds));
    lines.push(format!("Max retries:    {}", d.max_retries));
    lines.push(format!("Allowed tools:  {}", d.allowed_tools));
    lines.push(format!("Required tools: {} (at least one)", d.required_tools));
    lines.push(format!("Min tools used: {}", d.min_tools_used));
    lines.push(format!("Priority:       {}", d.orchestration.priority));
    lines.push(format!("Max parallel:   {}", d.orchestration.max_parallel));

    let prompt = d.system_prompt.trim();
    if !prompt.is_empty() {
        lines.push(String::new());
        lines.push(prompt.to_string());
    }

    lines.join("\n") + "\n"
}

pub(crate) fn render_lint(registry: &Registry, report: &LoadReport) -> String {
    let mut lines: Vec<String> = report
        .failures
        .iter()
        .map(|f| format!("FAIL  {}: {}", f.path.display(), f.error))
        .collect();
    lines.extend(
        report
            .warnings
            .iter()
            .map(|w| format!("WARN  {}: {}", w.path.display(), w.message)),
    );
    lines.push(format!(
        "{} file(s) scanned: {} registered, {} failed, {} warning(s)",
        report.scanned.len(),
        registry.len(),
        report.failures.len(),
        report.warnings.len()
    ));

    lines.join("\n") + "\n"
}
