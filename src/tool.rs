//! Tool capability names.
//!
//! Persona files list tools as free-text strings. They are parsed into the
//! closed [`Tool`] enumeration at registration time so typos surface before
//! any run is checked.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A capability an agent may request from its host.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tool {
    Read,
    Write,
    Edit,
    MultiEdit,
    Bash,
    Grep,
    Glob,
    LS,
    WebFetch,
    WebSearch,
    Task,
    TodoWrite,
    NotebookEdit,
}

/// Every known tool, in declaration order.
pub const ALL_TOOLS: &[Tool] = &[
    Tool::Read,
    Tool::Write,
    Tool::Edit,
    Tool::MultiEdit,
    Tool::Bash,
    Tool::Grep,
    Tool::Glob,
    Tool::LS,
    Tool::WebFetch,
    Tool::WebSearch,
    Tool::Task,
    Tool::TodoWrite,
    Tool::NotebookEdit,
];

impl Tool {
    /// Canonical name as written in persona files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Read => "Read",
            Tool::Write => "Write",
            Tool::Edit => "Edit",
            Tool::MultiEdit => "MultiEdit",
            Tool::Bash => "Bash",
            Tool::Grep => "Grep",
            Tool::Glob => "Glob",
            Tool::LS => "LS",
            Tool::WebFetch => "WebFetch",
            Tool::WebSearch => "WebSearch",
            Tool::Task => "Task",
            Tool::TodoWrite => "TodoWrite",
            Tool::NotebookEdit => "NotebookEdit",
        }
    }

    /// Capability alias (`read-file`, `run-shell`, ...) for tools that have one.
    pub fn capability_alias(&self) -> Option<&'static str> {
        match self {
            Tool::Read => Some("read-file"),
            Tool::Write => Some("write-file"),
            Tool::Edit => Some("edit-file"),
            Tool::Bash => Some("run-shell"),
            Tool::Grep => Some("search-text"),
            Tool::Glob => Some("search-files"),
            Tool::LS => Some("list-dir"),
            _ => None,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a tool name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool '{0}'")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ALL_TOOLS
            .iter()
            .copied()
            .find(|tool| {
                tool.as_str().eq_ignore_ascii_case(trimmed)
                    || tool
                        .capability_alias()
                        .is_some_and(|alias| alias.eq_ignore_ascii_case(trimmed))
            })
            .ok_or_else(|| UnknownTool(trimmed.to_string()))
    }
}

impl Serialize for Tool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Tool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// An ordered set of distinct tools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolSet(BTreeSet<Tool>);

impl ToolSet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Parse a list of raw names, failing on the first unknown one.
    pub fn parse<I, S>(names: I) -> Result<Self, UnknownTool>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter(|name| !name.as_ref().trim().is_empty())
            .map(|name| name.as_ref().parse::<Tool>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    /// Parse a comma-separated list such as `Read, Edit, Bash`.
    pub fn parse_list(list: &str) -> Result<Self, UnknownTool> {
        Self::parse(list.split(','))
    }

    pub fn insert(&mut self, tool: Tool) -> bool {
        self.0.insert(tool)
    }

    pub fn contains(&self, tool: Tool) -> bool {
        self.0.contains(&tool)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Tool> + '_ {
        self.0.iter().copied()
    }

    pub fn is_subset(&self, other: &ToolSet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn intersection(&self, other: &ToolSet) -> ToolSet {
        Self(self.0.intersection(&other.0).copied().collect())
    }

    pub fn difference(&self, other: &ToolSet) -> ToolSet {
        Self(self.0.difference(&other.0).copied().collect())
    }
}

impl FromIterator<Tool> for ToolSet {
    fn from_iter<I: IntoIterator<Item = Tool>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Tool; N]> for ToolSet {
    fn from(tools: [Tool; N]) -> Self {
        tools.into_iter().collect()
    }
}

impl fmt::Display for ToolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Tool::as_str).collect();
        f.write_str(&names.join(", "))
    }
}
