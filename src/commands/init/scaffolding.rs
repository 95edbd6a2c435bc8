//! Directory and file scaffolding for the init command.

use crate::config::Config;
use crate::context::WorkspaceContext;
use crate::error::{BrigadeError, Result};
use crate::fs::atomic_write_file;
use std::fs;
use std::path::Path;

const PERSONAS_README: &str = "\
# Agent personas

Each `*.md` file here defines one agent. The YAML frontmatter is the
contract; the markdown body is the agent's system prompt.

```markdown
---
name: incident-responder
description: Use when production is degraded or an outage is reported
model: reasoning
fallback_model: balanced
timeout_seconds: 900
max_retries: 2
tools: Read, Grep, Bash, Edit
required_tools: [Read, Bash]
min_tools_used: 3
orchestration:
  priority: high
  max_parallel: 2
---

You are an incident responder...
```

Run `brigade agents lint` after editing.
";

/// Create `.brigade/` and `.brigade/locks/`.
pub(super) fn create_state_dirs(ctx: &WorkspaceContext) -> Result<()> {
    for dir in [&ctx.state_dir, &ctx.locks_dir] {
        fs::create_dir_all(dir).map_err(|e| {
            BrigadeError::UserError(format!(
                "failed to create directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
    }
    Ok(())
}

/// Write a default `config.yaml` if none exists. Returns whether one was written.
pub(super) fn ensure_config(ctx: &WorkspaceContext) -> Result<bool> {
    let config_path = ctx.config_path();
    if config_path.exists() {
        return Ok(false);
    }
    Config::default().save(&config_path)?;
    Ok(true)
}

/// Ensure `.brigade/.gitignore` ignores the machine-local `locks/` directory.
pub(super) fn ensure_gitignore(ctx: &WorkspaceContext) -> Result<()> {
    let gitignore_path = ctx.state_dir.join(".gitignore");
    let existing = fs::read_to_string(&gitignore_path).unwrap_or_default();

    if existing.lines().any(|line| line.trim() == "locks/") {
        return Ok(());
    }

    let mut new_content = existing;
    if !new_content.is_empty() && !new_content.ends_with('\n') {
        new_content.push('\n');
    }
    new_content.push_str("# Machine-local files (never commit)\nlocks/\n");
    atomic_write_file(&gitignore_path, &new_content)
}

/// Create the personas directory with a README. Returns whether it was created.
pub(super) fn ensure_personas_dir(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }

    fs::create_dir_all(path).map_err(|e| {
        BrigadeError::UserError(format!(
            "failed to create personas directory '{}': {}",
            path.display(),
            e
        ))
    })?;
    atomic_write_file(path.join("README.md"), PERSONAS_README)?;
    Ok(true)
}
