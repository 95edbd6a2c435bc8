//! Tests for persona parsing and descriptor validation.

use super::*;
use crate::config::DescriptorDefaults;
use crate::error::BrigadeError;
use crate::tool::{Tool, ToolSet};

const MINIMAL_PERSONA: &str = r#"---
name: planner-decomposer
tools: Read, Grep
---

Break the request into steps.
"#;

const FULL_PERSONA: &str = r#"---
name: incident-responder
description: Use PROACTIVELY when production is degraded or an outage is reported
model: opus
fallback_model: sonnet
fallback_on: [rate_limit, timeout]
timeout_seconds: 900
max_retries: 3
tools:
  - Read
  - Grep
  - Bash
  - Edit
required_tools: [Read, Bash]
min_tools_used: 3
orchestration:
  priority: high
  max_parallel: 2
color: red
---

You are an incident responder.

## Checklist
- Stabilize first
"#;

fn descriptor_from(content: &str) -> crate::error::Result<AgentDescriptor> {
    let persona = PersonaFile::parse(content)?;
    AgentDescriptor::from_persona(&persona, &DescriptorDefaults::default())
}

fn assert_invalid(result: crate::error::Result<AgentDescriptor>, needle: &str) {
    match result {
        Err(BrigadeError::InvalidDescriptor { reason, .. }) => {
            assert!(
                reason.contains(needle),
                "expected reason containing '{}', got '{}'",
                needle,
                reason
            );
        }
        other => panic!("expected InvalidDescriptor, got {:?}", other),
    }
}

#[test]
fn test_parse_minimal_persona_uses_defaults() {
    let descriptor = descriptor_from(MINIMAL_PERSONA).unwrap();
    let defaults = DescriptorDefaults::default();

    assert_eq!(descriptor.name, "planner-decomposer");
    assert_eq!(descriptor.trigger_description, "");
    assert_eq!(descriptor.timeout_seconds, defaults.timeout_seconds);
    assert_eq!(descriptor.max_retries, defaults.max_retries);
    assert_eq!(descriptor.min_tools_used, defaults.min_tools_used);
    assert_eq!(descriptor.model.primary, ModelTier::Inherit);
    assert!(descriptor.model.fallback.is_none());
    assert_eq!(descriptor.orchestration.priority, Priority::Medium);
    assert_eq!(descriptor.orchestration.max_parallel, 1);
    assert_eq!(
        descriptor.allowed_tools,
        ToolSet::from([Tool::Read, Tool::Grep])
    );
    // Omitted required_tools means any allowed tool satisfies the gate.
    assert_eq!(descriptor.required_tools, descriptor.allowed_tools);
    assert_eq!(descriptor.system_prompt, "\nBreak the request into steps.\n");
}

#[test]
fn test_parse_full_persona() {
    let descriptor = descriptor_from(FULL_PERSONA).unwrap();

    assert_eq!(descriptor.name, "incident-responder");
    assert!(descriptor.trigger_description.starts_with("Use PROACTIVELY"));
    assert_eq!(descriptor.model.primary, ModelTier::Reasoning);
    let fallback = descriptor.model.fallback.as_ref().unwrap();
    assert_eq!(fallback.model, ModelTier::Balanced);
    assert_eq!(
        fallback.on,
        vec![FallbackTrigger::RateLimit, FallbackTrigger::Timeout]
    );
    assert_eq!(descriptor.timeout_seconds, 900);
    assert_eq!(descriptor.max_retries, 3);
    assert_eq!(descriptor.allowed_tools.len(), 4);
    assert_eq!(
        descriptor.required_tools,
        ToolSet::from([Tool::Read, Tool::Bash])
    );
    assert_eq!(descriptor.min_tools_used, 3);
    assert_eq!(descriptor.orchestration.priority, Priority::High);
    assert_eq!(descriptor.orchestration.max_parallel, 2);
    assert!(descriptor.system_prompt.contains("## Checklist"));
}

#[test]
fn test_unknown_frontmatter_keys_are_preserved() {
    let persona = PersonaFile::parse(FULL_PERSONA).unwrap();
    assert_eq!(persona.unknown_keys(), vec!["color"]);
}

#[test]
fn test_crlf_line_endings() {
    let content = "---\r\nname: reviewer\r\ntools: Read\r\n---\r\nReview it.\r\n";
    let persona = PersonaFile::parse(content).unwrap();
    assert_eq!(persona.frontmatter.name, "reviewer");
    assert_eq!(persona.body, "Review it.\r\n");
}

#[test]
fn test_missing_opening_delimiter_fails() {
    let err = PersonaFile::parse("name: x\n---\n").unwrap_err();
    assert!(err.to_string().contains("must start with '---'"));
}

#[test]
fn test_missing_closing_delimiter_fails() {
    let err = PersonaFile::parse("---\nname: x\ntools: Read\n").unwrap_err();
    assert!(err.to_string().contains("missing closing '---'"));
}

#[test]
fn test_empty_frontmatter_is_rejected_at_validation() {
    let result = descriptor_from("---\n---\nbody\n");
    assert_invalid(result, "name cannot be empty");
}

#[test]
fn test_negative_timeout_is_invalid() {
    let content = "---\nname: a\ntools: Read\ntimeout_seconds: -5\n---\n";
    assert_invalid(descriptor_from(content), "timeout_seconds must be greater than 0");
}

#[test]
fn test_zero_timeout_is_invalid() {
    let content = "---\nname: a\ntools: Read\ntimeout_seconds: 0\n---\n";
    assert_invalid(descriptor_from(content), "timeout_seconds must be greater than 0");
}

#[test]
fn test_negative_max_retries_is_invalid() {
    let content = "---\nname: a\ntools: Read\nmax_retries: -1\n---\n";
    assert_invalid(descriptor_from(content), "max_retries must be a non-negative");
}

#[test]
fn test_zero_max_retries_is_valid() {
    let content = "---\nname: a\ntools: Read\nmax_retries: 0\n---\n";
    let descriptor = descriptor_from(content).unwrap();
    assert_eq!(descriptor.max_retries, 0);
    assert!(descriptor.attempt_allowed(1));
    assert!(!descriptor.attempt_allowed(2));
}

#[test]
fn test_unknown_tool_is_invalid() {
    let content = "---\nname: a\ntools: Read, Grepp\n---\n";
    assert_invalid(descriptor_from(content), "unknown tool 'Grepp' in tools");
}

#[test]
fn test_required_tools_must_be_allowed() {
    let content = "---\nname: a\ntools: Read\nrequired_tools: [Read, Bash]\n---\n";
    assert_invalid(descriptor_from(content), "required tools not in allowed tools: Bash");
}

#[test]
fn test_min_tools_used_cannot_exceed_allowed() {
    let content = "---\nname: a\ntools: Read, Edit\nmin_tools_used: 3\n---\n";
    assert_invalid(descriptor_from(content), "min_tools_used (3) exceeds");
}

#[test]
fn test_no_tools_is_invalid() {
    let content = "---\nname: a\n---\n";
    assert_invalid(descriptor_from(content), "required_tools is empty");
}

#[test]
fn test_bad_name_is_invalid() {
    let content = "---\nname: Incident Responder\ntools: Read\n---\n";
    assert_invalid(descriptor_from(content), "name must be lowercase");
}

#[test]
fn test_fallback_same_as_primary_is_invalid() {
    let content = "---\nname: a\ntools: Read\nmodel: sonnet\nfallback_model: balanced\n---\n";
    assert_invalid(descriptor_from(content), "is the same as model");
}

#[test]
fn test_fallback_without_triggers_defaults_to_all() {
    let content = "---\nname: a\ntools: Read\nmodel: opus\nfallback_model: haiku\n---\n";
    let descriptor = descriptor_from(content).unwrap();
    let fallback = descriptor.model.fallback.unwrap();
    assert_eq!(fallback.on.len(), 3);
}

#[test]
fn test_fallback_triggers_without_model_is_invalid() {
    let content = "---\nname: a\ntools: Read\nfallback_on: [timeout]\n---\n";
    assert_invalid(descriptor_from(content), "fallback_model is missing");
}

#[test]
fn test_zero_max_parallel_is_invalid() {
    let content = "---\nname: a\ntools: Read\norchestration:\n  max_parallel: 0\n---\n";
    assert_invalid(descriptor_from(content), "max_parallel must be greater than 0");
}

#[test]
fn test_custom_defaults_are_applied() {
    let defaults = DescriptorDefaults {
        timeout_seconds: 60,
        max_retries: 0,
        min_tools_used: 2,
        priority: Priority::Low,
        max_parallel: 4,
        model: ModelTier::Fast,
    };
    let persona = PersonaFile::parse(MINIMAL_PERSONA).unwrap();
    let descriptor = AgentDescriptor::from_persona(&persona, &defaults).unwrap();

    assert_eq!(descriptor.timeout_seconds, 60);
    assert_eq!(descriptor.max_retries, 0);
    assert_eq!(descriptor.min_tools_used, 2);
    assert_eq!(descriptor.orchestration.priority, Priority::Low);
    assert_eq!(descriptor.orchestration.max_parallel, 4);
    assert_eq!(descriptor.model.primary, ModelTier::Fast);
}

#[test]
fn test_builder_descriptor_validates() {
    let descriptor = AgentDescriptor::new(
        "database-migration",
        ToolSet::from([Tool::Read, Tool::Edit, Tool::Bash]),
    )
    .with_required_tools(ToolSet::from([Tool::Bash]))
    .with_min_tools_used(2)
    .with_timeout_seconds(1200)
    .with_max_retries(1);

    assert!(descriptor.validate().is_ok());
    assert!(descriptor.attempt_allowed(2));
    assert!(!descriptor.attempt_allowed(3));
    assert!(!descriptor.attempt_allowed(0));
}
