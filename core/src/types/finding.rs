use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Final finding type reported to callers of the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub rule_id: String,
    /// Stable message identifier, e.g. `awaitAsyncUtil`.
    pub message_id: String,
    pub kind: FindingKind,
    pub title: String,
    pub description: String,
    pub severity: Severity,

    /// Interpolation data used to render the message.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,

    /// File path where this finding was detected
    pub file_path: String,

    /// Line number (1-based) where the finding starts
    pub line: u32,

    /// Column number (1-based) where the finding starts
    pub column: u32,

    /// Line number (1-based) where the finding ends
    pub end_line: u32,

    /// Column number (1-based) where the finding ends
    pub end_column: u32,

    /// Byte range (start, end) of the offending node.
    pub byte_range: (usize, usize),

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

/// Rule classification, mirroring the problem/suggestion split of lint rules.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Code that will likely misbehave (flaky or silently passing tests).
    Problem,
    /// Code that works but should be written differently.
    Suggestion,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}
