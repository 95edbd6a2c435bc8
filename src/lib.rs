//! Brigade: file-based registry, tool-usage gate, and session reporter for sub-agent personas.
//!
//! An agent persona is a markdown file whose YAML frontmatter states a
//! contract: which tools the agent may use, how many distinct tools a run
//! must touch, which of them are required, and advisory timeout, retry,
//! and orchestration limits. Brigade covers three pieces:
//!
//! - [`registry`]: parse and validate personas into [`AgentDescriptor`]s
//! - [`gate`]: decide whether a finished run's tool usage satisfies its descriptor
//! - [`reporter`]: track sessions through `running -> {completed, failed}`
//!
//! Running agents, enforcing timeouts, and scheduling retries are the host's job.
//!
//! ```no_run
//! use brigade::gate;
//! use brigade::reporter::{Reporter, SessionStatus};
//! use brigade::tool::{Tool, ToolSet};
//! use brigade::{AgentDescriptor, Registry};
//!
//! let mut registry = Registry::new();
//! registry.register(
//!     AgentDescriptor::new("incident-responder", ToolSet::from([Tool::Read, Tool::Bash, Tool::Edit]))
//!         .with_min_tools_used(2),
//! )?;
//!
//! let reporter = Reporter::new();
//! let id = reporter.start_session("incident-responder", "diagnose outage")?;
//!
//! let descriptor = registry.get("incident-responder")?;
//! match gate::validate(descriptor, &ToolSet::from([Tool::Read, Tool::Bash])) {
//!     Ok(pass) => reporter.finish(id, SessionStatus::Completed, Some(pass.message()))?,
//!     Err(failure) => reporter.finish(id, SessionStatus::Failed, Some(failure.to_string()))?,
//! }
//! # Ok::<(), brigade::error::BrigadeError>(())
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod gate;
pub mod locks;
pub mod registry;
pub mod reporter;
pub mod tool;

#[cfg(test)]
mod test_support;

pub use descriptor::AgentDescriptor;
pub use registry::Registry;
