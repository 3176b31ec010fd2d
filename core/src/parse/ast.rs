use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tree_sitter::{Node, Tree};

use crate::types::context::Language;

/// Engine-internal identifier for a file in a lint run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileId(pub u64);

/// Text range in (line, col) space; 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

/// Lightweight handle to "where in the AST" something lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstLocation {
    pub file_id: FileId,
    pub range: TextRange,
    pub start_byte: usize,
    pub end_byte: usize,
}

impl AstLocation {
    /// 1-based line of the start position.
    pub fn line(&self) -> u32 {
        self.range.start_line + 1
    }

    /// 1-based column of the start position.
    pub fn column(&self) -> u32 {
        self.range.start_col + 1
    }
}

/// A fully parsed source file: source + tree-sitter AST + language tag.
#[derive(Debug)]
pub struct ParsedFile {
    pub file_id: FileId,
    pub path: String,
    pub language: Language,
    pub source: Arc<String>,
    pub tree: Tree,
}

impl ParsedFile {
    /// Convert a tree-sitter node range into an AstLocation.
    pub fn location_for_node(&self, node: &Node) -> AstLocation {
        let range = node.range();
        let start = range.start_point;
        let end = range.end_point;

        AstLocation {
            file_id: self.file_id,
            range: TextRange {
                start_line: start.row as u32,
                start_col: start.column as u32,
                end_line: end.row as u32,
                end_col: end.column as u32,
            },
            start_byte: range.start_byte,
            end_byte: range.end_byte,
        }
    }

    /// Get the exact source text for a node.
    pub fn text_for_node(&self, node: &Node) -> String {
        self.text_of(node).to_string()
    }

    /// Borrow the source text for a node without allocating.
    ///
    /// Returns an empty string if the node range does not fall on char
    /// boundaries of the stored source.
    pub fn text_of(&self, node: &Node) -> &str {
        self.source.get(node.start_byte()..node.end_byte()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::typescript::parse_typescript_file;
    use crate::types::context::SourceFile;

    fn parse(content: &str) -> ParsedFile {
        let sf = SourceFile {
            path: "sample.test.ts".to_string(),
            language: Language::Typescript,
            content: content.to_string(),
        };
        parse_typescript_file(FileId(7), &sf).expect("parse should succeed")
    }

    #[test]
    fn test_file_id_orders_by_inner_value() {
        assert!(FileId(1) < FileId(2));
        assert_eq!(FileId(3), FileId(3));
    }

    #[test]
    fn test_location_reports_one_based_positions() {
        let loc = AstLocation {
            file_id: FileId(1),
            range: TextRange {
                start_line: 3,
                start_col: 10,
                end_line: 3,
                end_col: 20,
            },
            start_byte: 40,
            end_byte: 50,
        };
        assert_eq!(loc.line(), 4);
        assert_eq!(loc.column(), 11);
    }

    #[test]
    fn test_location_for_node_tracks_bytes_and_points() {
        let parsed = parse("const a = 1;\nwaitFor(cb);\n");
        let root = parsed.tree.root_node();
        let stmt = root.named_child(1).expect("second statement");
        let loc = parsed.location_for_node(&stmt);

        assert_eq!(loc.file_id, FileId(7));
        assert_eq!(loc.range.start_line, 1);
        assert_eq!(loc.range.start_col, 0);
        assert_eq!(loc.start_byte, 13);
        assert_eq!(parsed.text_of(&stmt), "waitFor(cb);");
    }

    #[test]
    fn test_location_round_trips_through_json() {
        let parsed = parse("waitFor(cb);");
        let stmt = parsed.tree.root_node().named_child(0).unwrap();
        let loc = parsed.location_for_node(&stmt);
        let json = serde_json::to_string(&loc).unwrap();
        let back: AstLocation = serde_json::from_str(&json).unwrap();
        assert_eq!(loc, back);
    }
}
