use serde::{Deserialize, Serialize};
use similar::TextDiff;

use crate::parse::ast::FileId;

/// A patch that applies one or more edits (hunks) to a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePatch {
    pub file_id: FileId,
    pub hunks: Vec<PatchHunk>,
}

impl FilePatch {
    /// Patch with a single byte-range replacement.
    pub fn replace(file_id: FileId, start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self {
            file_id,
            hunks: vec![PatchHunk {
                range: PatchRange::ReplaceBytes { start, end },
                replacement: replacement.into(),
            }],
        }
    }
}

/// A single edit operation inside a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchHunk {
    pub range: PatchRange,
    pub replacement: String,
}

/// Where a hunk applies, in byte offsets of the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatchRange {
    /// Insert at this byte offset; no bytes removed.
    InsertAt { byte_offset: usize },

    /// Replace the byte range [start, end) with `replacement`.
    ReplaceBytes { start: usize, end: usize },
}

impl PatchRange {
    fn bounds(&self, len: usize) -> (usize, usize) {
        match *self {
            PatchRange::InsertAt { byte_offset } => {
                let off = byte_offset.min(len);
                (off, off)
            }
            PatchRange::ReplaceBytes { start, end } => (start.min(len), end.min(len)),
        }
    }
}

/// Apply a `FilePatch` to in-memory contents and return the new contents.
///
/// Hunks are applied right to left so earlier ranges keep their offsets.
/// Hunks that are inverted, overlap a previously applied hunk, or split a
/// UTF-8 character are skipped.
pub fn apply_file_patch(original: &str, patch: &FilePatch) -> String {
    let mut edits: Vec<(usize, usize, &str)> = patch
        .hunks
        .iter()
        .map(|h| {
            let (start, end) = h.range.bounds(original.len());
            (start, end, h.replacement.as_str())
        })
        .filter(|(start, end, _)| {
            start <= end && original.is_char_boundary(*start) && original.is_char_boundary(*end)
        })
        .collect();
    edits.sort_by_key(|(start, end, _)| (*start, *end));

    let mut text = original.to_string();
    let mut floor = original.len();
    for (start, end, replacement) in edits.into_iter().rev() {
        if end > floor {
            continue;
        }
        text.replace_range(start..end, replacement);
        floor = start;
    }

    text
}

/// Build a unified diff string between `before` and `after`.
pub fn make_unified_diff(path: &str, before: &str, after: &str) -> String {
    TextDiff::from_lines(before, after)
        .unified_diff()
        .context_radius(3)
        .header(path, path)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_swaps_module_name_inside_quotes() {
        let original = "import { screen } from '@testing-library/dom';\n";
        let start = original.find("@testing").unwrap();
        let end = start + "@testing-library/dom".len();
        let patch = FilePatch::replace(FileId(1), start, end, "@testing-library/react");
        assert_eq!(
            apply_file_patch(original, &patch),
            "import { screen } from '@testing-library/react';\n"
        );
    }

    #[test]
    fn test_insert_at_clamps_to_end() {
        let patch = FilePatch {
            file_id: FileId(1),
            hunks: vec![PatchHunk {
                range: PatchRange::InsertAt { byte_offset: 100 },
                replacement: ";".to_string(),
            }],
        };
        assert_eq!(apply_file_patch("waitFor(cb)", &patch), "waitFor(cb);");
    }

    #[test]
    fn test_multiple_hunks_apply_right_to_left() {
        let original = "aaa bbb ccc";
        let patch = FilePatch {
            file_id: FileId(1),
            hunks: vec![
                PatchHunk {
                    range: PatchRange::ReplaceBytes { start: 8, end: 11 },
                    replacement: "CCC".to_string(),
                },
                PatchHunk {
                    range: PatchRange::ReplaceBytes { start: 0, end: 3 },
                    replacement: "AAAA".to_string(),
                },
            ],
        };
        assert_eq!(apply_file_patch(original, &patch), "AAAA bbb CCC");
    }

    #[test]
    fn test_overlapping_hunk_is_skipped() {
        let patch = FilePatch {
            file_id: FileId(1),
            hunks: vec![
                PatchHunk {
                    range: PatchRange::ReplaceBytes { start: 0, end: 5 },
                    replacement: "X".to_string(),
                },
                PatchHunk {
                    range: PatchRange::ReplaceBytes { start: 3, end: 8 },
                    replacement: "Y".to_string(),
                },
            ],
        };
        assert_eq!(apply_file_patch("0123456789", &patch), "012Y89");
    }

    #[test]
    fn test_hunk_splitting_a_character_is_skipped() {
        let original = "é";
        let patch = FilePatch::replace(FileId(1), 1, 2, "e");
        assert_eq!(apply_file_patch(original, &patch), "é");
    }

    #[test]
    fn test_unified_diff_marks_changed_lines() {
        let diff = make_unified_diff(
            "a.test.ts",
            "import x from 'dom-testing-library';\n",
            "import x from 'react-testing-library';\n",
        );
        assert!(diff.contains("a.test.ts"));
        assert!(diff.contains("-import x from 'dom-testing-library';"));
        assert!(diff.contains("+import x from 'react-testing-library';"));
    }

    #[test]
    fn test_unified_diff_without_changes_has_no_hunks() {
        let diff = make_unified_diff("a.test.ts", "same\n", "same\n");
        assert!(!diff.contains("@@"));
    }

    #[test]
    fn test_patch_range_serializes_with_kind_tag() {
        let json = serde_json::to_string(&PatchRange::ReplaceBytes { start: 1, end: 2 }).unwrap();
        assert!(json.contains("\"kind\":\"replace_bytes\""));
    }
}
