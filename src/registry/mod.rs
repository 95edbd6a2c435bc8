//! Agent descriptor registry.
//!
//! An in-memory, name-keyed store of validated [`AgentDescriptor`]s. Records
//! are immutable once registered: there is no update or delete, and a second
//! registration under the same name is rejected.
//!
//! Descriptors normally come from persona files on disk; see
//! [`Registry::load_dir`].

mod loader;

pub use loader::{LoadFailure, LoadReport, LoadWarning};

use crate::descriptor::AgentDescriptor;
use crate::error::{BrigadeError, Result};
use std::collections::BTreeMap;

/// Name-keyed descriptor store, iterated in name order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    agents: BTreeMap<String, AgentDescriptor>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor.
    ///
    /// # Errors
    ///
    /// * `BrigadeError::InvalidDescriptor` - the descriptor breaks an invariant
    /// * `BrigadeError::DuplicateName` - an agent with this name already exists
    pub fn register(&mut self, descriptor: AgentDescriptor) -> Result<()> {
        descriptor.validate()?;

        if self.agents.contains_key(&descriptor.name) {
            return Err(BrigadeError::DuplicateName(descriptor.name));
        }

        tracing::debug!(agent = %descriptor.name, "registered agent");
        self.agents.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Look up a descriptor by name.
    pub fn get(&self, name: &str) -> Result<&AgentDescriptor> {
        self.agents
            .get(name)
            .ok_or_else(|| BrigadeError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.agents.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentDescriptor> {
        self.agents.values()
    }
}
