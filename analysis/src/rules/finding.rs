use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use waitcheck_core::parse::ast::{AstLocation, FileId};
use waitcheck_core::types::finding::{Finding, FindingKind, Severity};
use waitcheck_core::types::patch::FilePatch;

/// A finding produced by a rule (engine-internal).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleFinding {
    /// The ID of the rule that produced this.
    pub rule_id: String,

    /// Stable message identifier, e.g. `awaitAsyncUtil`.
    pub message_id: String,

    /// Interpolation data for the message template.
    #[serde(default)]
    pub data: BTreeMap<String, String>,

    /// Rendered message.
    pub title: String,

    pub description: Option<String>,

    pub kind: FindingKind,

    pub severity: Severity,

    pub file_id: FileId,
    pub file_path: String,

    /// 1-based start position.
    pub line: u32,
    pub column: u32,

    /// 1-based end position.
    pub end_line: u32,
    pub end_column: u32,

    /// Byte range (start_byte, end_byte) of the reported node.
    pub byte_range: (usize, usize),

    /// Optional structured fix for this file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<FilePatch>,

    /// Tags for filtering.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RuleFinding {
    /// Finding at `location`, with the title rendered from `template`.
    pub fn at_location(
        rule_id: &str,
        message_id: &str,
        template: &str,
        data: BTreeMap<String, String>,
        file_path: &str,
        location: &AstLocation,
    ) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            message_id: message_id.to_string(),
            title: render_message(template, &data),
            data,
            description: None,
            kind: FindingKind::Problem,
            severity: Severity::Medium,
            file_id: location.file_id,
            file_path: file_path.to_string(),
            line: location.line(),
            column: location.column(),
            end_line: location.range.end_line + 1,
            end_column: location.range.end_col + 1,
            byte_range: (location.start_byte, location.end_byte),
            patch: None,
            tags: Vec::new(),
        }
    }
}

/// Substitute `{{ key }}` / `{{key}}` placeholders from `data`.
///
/// Unknown placeholders are kept verbatim.
pub fn render_message(template: &str, data: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = after[..end].trim();
        match data.get(key) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

impl From<RuleFinding> for Finding {
    fn from(rf: RuleFinding) -> Self {
        Self {
            id: format!("{}:{}:{}:{}", rf.rule_id, rf.file_path, rf.line, rf.column),
            rule_id: rf.rule_id,
            message_id: rf.message_id,
            kind: rf.kind,
            title: rf.title,
            description: rf.description.unwrap_or_default(),
            severity: rf.severity,
            data: rf.data,
            file_path: rf.file_path,
            line: rf.line,
            column: rf.column,
            end_line: rf.end_line,
            end_column: rf.end_column,
            byte_range: rf.byte_range,
            diff: None, // will be filled by session.rs
        }
    }
}
