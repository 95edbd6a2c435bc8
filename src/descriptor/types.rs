//! Enumerations and small records carried by an agent descriptor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Orchestration priority hint for the external scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Underlying model tier an agent runs on.
///
/// Persona files in the wild use vendor labels; those are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelTier {
    /// Fast, inexpensive tier.
    #[serde(alias = "haiku")]
    Fast,
    /// General-purpose tier.
    #[serde(alias = "sonnet")]
    Balanced,
    /// High-reasoning tier.
    #[serde(alias = "opus")]
    Reasoning,
    /// Use whatever model the host session is already running.
    #[default]
    Inherit,
}

impl ModelTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::Fast => "fast",
            ModelTier::Balanced => "balanced",
            ModelTier::Reasoning => "reasoning",
            ModelTier::Inherit => "inherit",
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition under which the host should switch to the fallback model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackTrigger {
    RateLimit,
    QuotaExhausted,
    Timeout,
}

/// Every fallback trigger, used when a fallback model lists none.
pub const ALL_FALLBACK_TRIGGERS: &[FallbackTrigger] = &[
    FallbackTrigger::RateLimit,
    FallbackTrigger::QuotaExhausted,
    FallbackTrigger::Timeout,
];

impl fmt::Display for FallbackTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FallbackTrigger::RateLimit => "rate_limit",
            FallbackTrigger::QuotaExhausted => "quota_exhausted",
            FallbackTrigger::Timeout => "timeout",
        })
    }
}

/// Secondary model and the conditions that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelFallback {
    pub model: ModelTier,
    pub on: Vec<FallbackTrigger>,
}

/// Primary model tier with an optional fallback.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModelSelection {
    pub primary: ModelTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<ModelFallback>,
}

impl ModelSelection {
    pub fn new(primary: ModelTier) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    /// Model the host should use given the failure it just observed, if any.
    pub fn model_for(&self, failure: Option<FallbackTrigger>) -> ModelTier {
        match (failure, &self.fallback) {
            (Some(trigger), Some(fallback)) if fallback.on.contains(&trigger) => fallback.model,
            _ => self.primary,
        }
    }
}

/// Advisory scheduling hints. Nothing in this crate enforces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orchestration {
    pub priority: Priority,
    pub max_parallel: u32,
}

impl Default for Orchestration {
    fn default() -> Self {
        Self {
            priority: Priority::Medium,
            max_parallel: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_tier_accepts_vendor_aliases() {
        let tier: ModelTier = serde_yaml::from_str("opus").unwrap();
        assert_eq!(tier, ModelTier::Reasoning);
        let tier: ModelTier = serde_yaml::from_str("haiku").unwrap();
        assert_eq!(tier, ModelTier::Fast);
        let tier: ModelTier = serde_yaml::from_str("balanced").unwrap();
        assert_eq!(tier, ModelTier::Balanced);
    }

    #[test]
    fn fallback_applies_only_on_listed_triggers() {
        let selection = ModelSelection {
            primary: ModelTier::Reasoning,
            fallback: Some(ModelFallback {
                model: ModelTier::Balanced,
                on: vec![FallbackTrigger::RateLimit],
            }),
        };

        assert_eq!(selection.model_for(None), ModelTier::Reasoning);
        assert_eq!(
            selection.model_for(Some(FallbackTrigger::RateLimit)),
            ModelTier::Balanced
        );
        assert_eq!(
            selection.model_for(Some(FallbackTrigger::Timeout)),
            ModelTier::Reasoning
        );
    }

    #[test]
    fn priority_orders_low_to_high() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
    }
}
