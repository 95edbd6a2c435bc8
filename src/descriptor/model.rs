//! The validated agent descriptor.

use super::frontmatter::{PersonaFile, ToolList};
use super::types::{ALL_FALLBACK_TRIGGERS, ModelFallback, ModelSelection, Orchestration};
use crate::config::DescriptorDefaults;
use crate::error::{BrigadeError, Result};
use crate::tool::ToolSet;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("Invalid agent name regex"));

/// Static, read-only description of one agent persona.
///
/// Construct with [`AgentDescriptor::new`] and the `with_*` helpers, or from a
/// persona file with [`AgentDescriptor::from_persona`]. Either way the
/// invariants are only guaranteed once [`AgentDescriptor::validate`] (or
/// registration, which calls it) has succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub name: String,

    /// Free-text matching hint. Never interpreted by brigade.
    pub trigger_description: String,

    pub model: ModelSelection,

    pub timeout_seconds: u64,

    pub max_retries: u32,

    pub allowed_tools: ToolSet,

    /// Tools of which at least one must be used for a run to pass.
    pub required_tools: ToolSet,

    /// Minimum number of distinct tools a run must use.
    pub min_tools_used: usize,

    pub orchestration: Orchestration,

    /// Markdown body of the persona file (the system prompt).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub system_prompt: String,
}

impl AgentDescriptor {
    /// Create a descriptor with default settings; `required_tools` equals `allowed_tools`.
    pub fn new(name: impl Into<String>, allowed_tools: ToolSet) -> Self {
        let defaults = DescriptorDefaults::default();
        Self {
            name: name.into(),
            trigger_description: String::new(),
            model: ModelSelection::new(defaults.model),
            timeout_seconds: defaults.timeout_seconds,
            max_retries: defaults.max_retries,
            required_tools: allowed_tools.clone(),
            allowed_tools,
            min_tools_used: defaults.min_tools_used,
            orchestration: Orchestration {
                priority: defaults.priority,
                max_parallel: defaults.max_parallel,
            },
            system_prompt: String::new(),
        }
    }

    pub fn with_required_tools(mut self, required: ToolSet) -> Self {
        self.required_tools = required;
        self
    }

    pub fn with_min_tools_used(mut self, min: usize) -> Self {
        self.min_tools_used = min;
        self
    }

    pub fn with_timeout_seconds(mut self, timeout: u64) -> Self {
        self.timeout_seconds = timeout;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_model(mut self, model: ModelSelection) -> Self {
        self.model = model;
        self
    }

    pub fn with_orchestration(mut self, orchestration: Orchestration) -> Self {
        self.orchestration = orchestration;
        self
    }

    pub fn with_trigger_description(mut self, description: impl Into<String>) -> Self {
        self.trigger_description = description.into();
        self
    }

    /// Build a descriptor from a parsed persona file, filling omitted fields from `defaults`.
    ///
    /// Range and tool-name problems are reported as `InvalidDescriptor`. The
    /// returned descriptor has already passed [`validate`](Self::validate).
    pub fn from_persona(persona: &PersonaFile, defaults: &DescriptorDefaults) -> Result<Self> {
        let fm = &persona.frontmatter;
        let name = fm.name.trim().to_string();
        let label = if name.is_empty() { "<unnamed>" } else { name.as_str() };

        let timeout_seconds = match fm.timeout_seconds {
            Some(v) if v <= 0 => {
                return Err(BrigadeError::invalid(
                    label,
                    format!("timeout_seconds must be greater than 0, got {}", v),
                ));
            }
            Some(v) => v as u64,
            None => defaults.timeout_seconds,
        };

        let max_retries = match fm.max_retries {
            Some(v) => u32::try_from(v).map_err(|_| {
                BrigadeError::invalid(
                    label,
                    format!("max_retries must be a non-negative integer, got {}", v),
                )
            })?,
            None => defaults.max_retries,
        };

        let min_tools_used = match fm.min_tools_used {
            Some(v) => usize::try_from(v).map_err(|_| {
                BrigadeError::invalid(
                    label,
                    format!("min_tools_used must be a non-negative integer, got {}", v),
                )
            })?,
            None => defaults.min_tools_used,
        };

        let allowed_tools = parse_tools(label, "tools", fm.tools.as_ref())?;
        let required_tools = match fm.required_tools.as_ref() {
            Some(list) => parse_tools(label, "required_tools", Some(list))?,
            None => allowed_tools.clone(),
        };

        let orchestration_fm = fm.orchestration.clone().unwrap_or_default();
        let max_parallel = match orchestration_fm.max_parallel {
            Some(v) => u32::try_from(v).map_err(|_| {
                BrigadeError::invalid(
                    label,
                    format!("orchestration.max_parallel must be a positive integer, got {}", v),
                )
            })?,
            None => defaults.max_parallel,
        };

        if fm.fallback_model.is_none() && !fm.fallback_on.is_empty() {
            return Err(BrigadeError::invalid(
                label,
                "fallback_on is set but fallback_model is missing",
            ));
        }
        let fallback = fm.fallback_model.map(|model| ModelFallback {
            model,
            on: if fm.fallback_on.is_empty() {
                ALL_FALLBACK_TRIGGERS.to_vec()
            } else {
                fm.fallback_on.clone()
            },
        });

        let descriptor = Self {
            name,
            trigger_description: fm.description.trim().to_string(),
            model: ModelSelection {
                primary: fm.model.unwrap_or(defaults.model),
                fallback,
            },
            timeout_seconds,
            max_retries,
            allowed_tools,
            required_tools,
            min_tools_used,
            orchestration: Orchestration {
                priority: orchestration_fm.priority.unwrap_or(defaults.priority),
                max_parallel,
            },
            system_prompt: persona.body.clone(),
        };

        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Check the data-model invariants.
    ///
    /// - `name` is non-empty lowercase kebab-case
    /// - `timeout_seconds > 0`
    /// - `required_tools` is non-empty and a subset of `allowed_tools`
    /// - `min_tools_used <= |allowed_tools|`
    /// - `orchestration.max_parallel >= 1`
    /// - a fallback model differs from the primary and lists at least one trigger
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(BrigadeError::invalid("<unnamed>", "name cannot be empty"));
        }
        if !NAME_REGEX.is_match(&self.name) {
            return Err(BrigadeError::invalid(
                &self.name,
                "name must be lowercase letters, digits, and '-' (e.g. 'incident-responder')",
            ));
        }

        if self.timeout_seconds == 0 {
            return Err(BrigadeError::invalid(
                &self.name,
                "timeout_seconds must be greater than 0",
            ));
        }

        if self.required_tools.is_empty() {
            return Err(BrigadeError::invalid(
                &self.name,
                "required_tools is empty; list at least one tool the agent must use",
            ));
        }

        let stray = self.required_tools.difference(&self.allowed_tools);
        if !stray.is_empty() {
            return Err(BrigadeError::invalid(
                &self.name,
                format!("required tools not in allowed tools: {}", stray),
            ));
        }

        if self.min_tools_used > self.allowed_tools.len() {
            return Err(BrigadeError::invalid(
                &self.name,
                format!(
                    "min_tools_used ({}) exceeds the number of allowed tools ({})",
                    self.min_tools_used,
                    self.allowed_tools.len()
                ),
            ));
        }

        if self.orchestration.max_parallel == 0 {
            return Err(BrigadeError::invalid(
                &self.name,
                "orchestration.max_parallel must be greater than 0",
            ));
        }

        if let Some(fallback) = &self.model.fallback {
            if fallback.model == self.model.primary {
                return Err(BrigadeError::invalid(
                    &self.name,
                    format!("fallback_model '{}' is the same as model", fallback.model),
                ));
            }
            if fallback.on.is_empty() {
                return Err(BrigadeError::invalid(
                    &self.name,
                    "fallback model has no fallback triggers",
                ));
            }
        }

        Ok(())
    }

    /// Whether attempt number `attempt` (1-based) is within the retry budget.
    ///
    /// The first attempt is not a retry, so `max_retries = 2` allows attempts 1 through 3.
    pub fn attempt_allowed(&self, attempt: u32) -> bool {
        attempt >= 1 && attempt - 1 <= self.max_retries
    }
}

fn parse_tools(name: &str, field: &str, list: Option<&ToolList>) -> Result<ToolSet> {
    let Some(list) = list else {
        return Ok(ToolSet::new());
    };
    ToolSet::parse(list.names())
        .map_err(|e| BrigadeError::invalid(name, format!("{} in {}", e, field)))
}
