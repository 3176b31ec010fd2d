use std::sync::Arc;

use anyhow::Result;
use tree_sitter::{Language as TsLanguage, Parser};

use crate::parse::ast::{FileId, ParsedFile};
use crate::types::context::SourceFile;

fn typescript_language() -> TsLanguage {
    tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
}

fn tsx_language() -> TsLanguage {
    tree_sitter_typescript::LANGUAGE_TSX.into()
}

/// Whether a path should be parsed with the JSX-aware grammar.
///
/// Plain `.ts` files must not use it: `<T>expr` casts are ambiguous with JSX.
fn wants_tsx_grammar(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    !(lower.ends_with(".ts") || lower.ends_with(".mts") || lower.ends_with(".cts"))
}

/// Parse a TypeScript or JavaScript test file into a `ParsedFile`.
pub fn parse_typescript_file(file_id: FileId, sf: &SourceFile) -> Result<ParsedFile> {
    let mut parser = Parser::new();

    let lang = if wants_tsx_grammar(&sf.path) {
        tsx_language()
    } else {
        typescript_language()
    };

    parser.set_language(&lang)?;

    let source = Arc::new(sf.content.clone());
    let tree = parser
        .parse(&*source, None)
        .ok_or_else(|| anyhow::anyhow!("failed to parse TypeScript source"))?;

    Ok(ParsedFile {
        file_id,
        path: sf.path.clone(),
        language: sf.language,
        source,
        tree,
    })
}
