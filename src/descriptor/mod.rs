//! Agent descriptors.
//!
//! A descriptor is the parameterized form of the contract every persona file
//! restates in prose: which model to run, how long a run may take, how many
//! retries the host may spend, which tools are allowed, and which of them a
//! run must exercise.
//!
//! - **Frontmatter**: parsing persona markdown files
//! - **Model**: the validated [`AgentDescriptor`] and its invariants
//! - **Types**: model tiers, fallback triggers, orchestration hints

mod frontmatter;
mod model;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use frontmatter::{OrchestrationFrontmatter, PersonaFile, PersonaFrontmatter, ToolList};
pub use model::AgentDescriptor;
pub use types::{
    FallbackTrigger, ModelFallback, ModelSelection, ModelTier, Orchestration, Priority,
};
