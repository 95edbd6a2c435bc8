//! Implementation of the `brigade init` command.
//!
//! # What `brigade init` does
//!
//! 1. Creates `.brigade/` and `.brigade/locks/` in the current directory
//! 2. Creates `.brigade/config.yaml` with defaults (if missing)
//! 3. Creates `.brigade/.gitignore` with `locks/` entry
//! 4. Creates the personas directory named by the config, with a README
//!
//! Running it inside an existing workspace changes nothing that is already there.

mod scaffolding;


use crate::context::WorkspaceContext;
use crate::error::{BrigadeError, Result};
use std::env;
use std::path::PathBuf;

use scaffolding::*;

/// What `init` created, for reporting.
#[derive(Debug, Default)]
pub(crate) struct InitOutcome {
    pub created_config: bool,
    pub created_personas_dir: bool,
    pub personas_dir: PathBuf,
}

/// Execute the `brigade init` command.
///
/// This command is **idempotent**: running it multiple times will not error
/// and will not overwrite an existing config or personas.
pub fn cmd_init() -> Result<()> {
    let cwd = env::current_dir().map_err(|e| {
        BrigadeError::UserError(format!("failed to get current working directory: {}", e))
    })?;
    let ctx = WorkspaceContext::at(&cwd);

    let outcome = init_workspace(&ctx)?;

    println!("Initialized brigade workspace at {}", ctx.root.display());
    if outcome.created_config {
        println!("  Created {}", ctx.config_path().display());
    }
    if outcome.created_personas_dir {
        println!("  Created {}", outcome.personas_dir.display());
    }
    println!();
    println!("Add persona files to {} and run:", outcome.personas_dir.display());
    println!("  brigade agents lint");

    Ok(())
}

/// Create (or complete) the workspace scaffolding under `ctx.root`.
pub(crate) fn init_workspace(ctx: &WorkspaceContext) -> Result<InitOutcome> {
    create_state_dirs(ctx)?;
    let created_config = ensure_config(ctx)?;
    ensure_gitignore(ctx)?;

    let config = ctx.load_config()?;
    let personas_dir = ctx.personas_dir(&config);
    let created_personas_dir = ensure_personas_dir(&personas_dir)?;

    tracing::debug!(root = %ctx.root.display(), created_config, created_personas_dir, "workspace initialized");

    Ok(InitOutcome {
        created_config,
        created_personas_dir,
        personas_dir,
    })
}
