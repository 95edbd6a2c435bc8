//! Execution validation gate.
//!
//! Decides whether a finished run used enough of its tools:
//! - Rule G1: fewer distinct tools than `min_tools_used` -> fail
//! - Rule G2: none of `required_tools` used -> fail
//!
//! The gate is a pure predicate. Retries and timeouts are the host's
//! business; it reads `max_retries` off the descriptor itself.

use crate::descriptor::AgentDescriptor;
use crate::tool::ToolSet;
use thiserror::Error;

/// Why a run failed the gate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateFailure {
    /// Rule G1.
    #[error("Used {used} tools, minimum {minimum} required")]
    InsufficientToolUsage { used: usize, minimum: usize },

    /// Rule G2.
    #[error("None of the required tools were used (required: {required})")]
    MissingRequiredCapability { required: ToolSet },
}

/// A run that passed the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePass {
    /// Number of distinct tools used.
    pub used: usize,
    /// The descriptor's `min_tools_used`.
    pub minimum: usize,
    /// Required tools that appeared in the run.
    pub required_hit: ToolSet,
    /// Tools used that the descriptor does not allow. Informational only.
    pub unlisted: ToolSet,
}

impl GatePass {
    /// Human-readable reason, in the same format as the G1 failure.
    pub fn message(&self) -> String {
        format!("Used {} tools, minimum {} required", self.used, self.minimum)
    }
}

/// Validate a run's tool usage against its descriptor.
///
/// Passes iff `|tools_used| >= min_tools_used` and `tools_used` contains at
/// least one required tool. Adding tools to a passing run never makes it fail.
pub fn validate(descriptor: &AgentDescriptor, tools_used: &ToolSet) -> Result<GatePass, GateFailure> {
    let used = tools_used.len();
    let minimum = descriptor.min_tools_used;

    if used < minimum {
        return Err(GateFailure::InsufficientToolUsage { used, minimum });
    }

    let required_hit = tools_used.intersection(&descriptor.required_tools);
    if required_hit.is_empty() {
        return Err(GateFailure::MissingRequiredCapability {
            required: descriptor.required_tools.clone(),
        });
    }

    Ok(GatePass {
        used,
        minimum,
        required_hit,
        unlisted: tools_used.difference(&descriptor.allowed_tools),
    })
}
