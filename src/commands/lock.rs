//! Implementation of the `brigade lock` commands.

use crate::cli::LockClearArgs;
use crate::context::require_workspace;
use crate::error::{BrigadeError, Result};
use crate::locks::{self, HeldLock};

/// Execute the `brigade lock list` command.
pub fn cmd_lock_list() -> Result<()> {
    let ctx = require_workspace()?;
    let config = ctx.load_config()?;

    let Some(lock) = locks::journal_lock_info(&ctx, &config)? else {
        println!("No active locks.");
        return Ok(());
    };

    println!("Active locks (1):");
    println!();
    print_lock(&lock);
    if lock.is_stale {
        println!(
            "    Status:     STALE (exceeds {} min threshold)",
            config.lock_stale_minutes
        );
        println!();
        println!("Note: the lock is stale. Use `brigade lock clear --force` to clear.");
    }

    Ok(())
}

/// Execute the `brigade lock clear` command.
pub fn cmd_lock_clear(args: LockClearArgs) -> Result<()> {
    if !args.force {
        return Err(BrigadeError::UserError(
            "refusing to clear lock without --force flag.\n\n\
             Clearing locks can corrupt the session journal if the lock holder is still active.\n\
             Only clear locks if you are certain the lock holder has crashed.\n\n\
             To clear the lock, run:\n  brigade lock clear --force"
                .to_string(),
        ));
    }

    let ctx = require_workspace()?;
    let config = ctx.load_config()?;

    let cleared = locks::clear_journal_lock(&ctx, &config)?;
    tracing::warn!(
        owner = %cleared.holder.owner,
        action = %cleared.holder.action,
        was_stale = cleared.is_stale,
        "journal lock cleared by force"
    );

    println!("Cleared lock: journal");
    println!();
    print_lock(&cleared);
    if cleared.is_stale {
        println!("    Status:     was STALE");
    }

    Ok(())
}

fn print_lock(lock: &HeldLock) {
    println!("  journal:");
    println!("    Owner:      {}", lock.holder.owner);
    if let Some(pid) = lock.holder.pid {
        println!("    PID:        {}", pid);
    }
    println!(
        "    Created:    {}",
        lock.holder.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("    Age:        {}", lock.holder.age());
    println!("    Action:     {}", lock.holder.action);
    println!("    Path:       {}", lock.path.display());
}
