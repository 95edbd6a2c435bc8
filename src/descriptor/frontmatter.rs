//! Persona file parsing.
//!
//! Persona files use YAML frontmatter delimited by `---` lines, followed by
//! a markdown body that serves as the agent's system prompt:
//!
//! ```text
//! ---
//! name: incident-responder
//! description: Use when production is degraded
//! tools: Read, Grep, Bash
//! min_tools_used: 2
//! ---
//!
//! You are an incident responder...
//! ```
//!
//! Numeric fields are read as signed integers so negative values produce a
//! descriptive registration error rather than a YAML type error. Unknown keys
//! are preserved in `extra`.

use super::types::{FallbackTrigger, ModelTier, Priority};
use crate::error::{BrigadeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A parsed persona file with frontmatter and markdown body.
#[derive(Debug, Clone)]
pub struct PersonaFile {
    /// The parsed frontmatter fields.
    pub frontmatter: PersonaFrontmatter,
    /// The markdown body (everything after the closing `---`), verbatim.
    pub body: String,
}

/// Tool list as written in frontmatter: a YAML sequence or a comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolList {
    Inline(String),
    List(Vec<String>),
}

impl ToolList {
    /// Individual tool names, trimmed, with empty entries dropped.
    pub fn names(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            ToolList::Inline(s) => s.split(',').collect(),
            ToolList::List(items) => items.iter().map(String::as_str).collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Raw orchestration block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestrationFrontmatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_parallel: Option<i64>,
}

/// Persona frontmatter fields before validation.
///
/// Everything except `name` is optional; omitted values are filled from the
/// workspace defaults when the descriptor is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonaFrontmatter {
    /// Unique agent identifier.
    #[serde(default)]
    pub name: String,

    /// Free-text hint describing when the agent should be invoked.
    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelTier>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_model: Option<ModelTier>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallback_on: Vec<FallbackTrigger>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<i64>,

    /// Allowed tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolList>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_tools: Option<ToolList>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_tools_used: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orchestration: Option<OrchestrationFrontmatter>,

    /// Any fields not explicitly defined above.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl PersonaFile {
    /// Parse a persona file from its content string.
    ///
    /// Both LF and CRLF line endings are accepted. The body is kept exactly
    /// as written, including its original line endings.
    pub fn parse(content: &str) -> Result<Self> {
        let (yaml, body) = split_frontmatter(content)?;

        let frontmatter: PersonaFrontmatter = if yaml.trim().is_empty() {
            PersonaFrontmatter::default()
        } else {
            serde_yaml::from_str(&yaml).map_err(|e| {
                BrigadeError::UserError(format!("failed to parse persona frontmatter: {}", e))
            })?
        };

        Ok(Self {
            frontmatter,
            body: body.to_string(),
        })
    }

    /// Load a persona file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BrigadeError::UserError(format!(
                "failed to read persona file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content).map_err(|e| match e {
            BrigadeError::UserError(msg) => {
                BrigadeError::UserError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Frontmatter keys this version of brigade does not understand.
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.frontmatter.extra.keys().map(String::as_str).collect()
    }
}

/// Split content into the frontmatter YAML (LF-normalized) and the body slice.
fn split_frontmatter(content: &str) -> Result<(String, &str)> {
    let mut lines = content.split_inclusive('\n');

    let first = lines.next().unwrap_or("");
    if first.trim_end_matches(['\r', '\n']) != "---" {
        return Err(BrigadeError::UserError(
            "persona file must start with '---' frontmatter delimiter".to_string(),
        ));
    }

    let mut offset = first.len();
    let mut yaml = String::new();
    for line in lines {
        let next_offset = offset + line.len();
        let bare = line.trim_end_matches(['\r', '\n']);
        if bare == "---" {
            return Ok((yaml, &content[next_offset..]));
        }
        yaml.push_str(bare);
        yaml.push('\n');
        offset = next_offset;
    }

    Err(BrigadeError::UserError(
        "persona file missing closing '---' frontmatter delimiter".to_string(),
    ))
}
