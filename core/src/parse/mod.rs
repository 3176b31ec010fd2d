pub mod ast;
pub mod typescript;

use crate::error::ParseError;
use crate::types::context::{Language, SourceFile};
use ast::{FileId, ParsedFile};

/// Generic entry point: parse a `SourceFile` into a `ParsedFile`.
pub fn parse_source_file(file_id: FileId, sf: &SourceFile) -> Result<ParsedFile, ParseError> {
    match sf.language {
        Language::Typescript | Language::Javascript => {
            typescript::parse_typescript_file(file_id, sf).map_err(|source| ParseError::File {
                file_path: sf.path.clone(),
                source,
            })
        }
    }
}
