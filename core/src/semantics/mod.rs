pub mod aliases;
pub mod callbacks;
pub mod handling;
pub mod node_utils;
pub mod settings;
pub mod traversal;
pub mod wrappers;

use std::sync::Arc;

use anyhow::Result;

use crate::parse::ast::{FileId, ParsedFile};
use crate::types::context::{Language, SourceFile};
use aliases::AliasTable;
use settings::TestingLibrarySettings;

pub use aliases::{
    BindingKind, IdentifierBinding, ImportForm, ModuleImport, QueryVariant, UtilityCategory, UtilityIdentity,
};
pub use handling::HandlingEvidence;
pub use wrappers::{WrapperBinding, WrapperRegistry};

/// Everything the rules need to know about one test file.
///
/// The alias table is built once per file; wrapper registries are owned by
/// each rule's traversal so nothing here is mutated after construction.
#[derive(Debug)]
pub struct TestFileSemantics {
    pub file_id: FileId,
    pub path: String,
    pub language: Language,
    pub parsed: Arc<ParsedFile>,
    pub settings: Arc<TestingLibrarySettings>,
    pub aliases: AliasTable,
}

impl TestFileSemantics {
    pub fn from_parsed(parsed: Arc<ParsedFile>, settings: Arc<TestingLibrarySettings>) -> Self {
        let aliases = AliasTable::from_parsed(&parsed, Arc::clone(&settings));
        if !aliases.imports_testing_library() {
            tracing::debug!(file = %parsed.path, "no testing-library import; resolution limited to assertions");
        }
        Self {
            file_id: parsed.file_id,
            path: parsed.path.clone(),
            language: parsed.language,
            parsed,
            settings,
            aliases,
        }
    }
}

/// Parse `sf` and build its semantics.
pub fn build_test_file_semantics(
    file_id: FileId,
    sf: &SourceFile,
    settings: Arc<TestingLibrarySettings>,
) -> Result<TestFileSemantics> {
    let parsed = crate::parse::parse_source_file(file_id, sf)?;
    Ok(TestFileSemantics::from_parsed(Arc::new(parsed), settings))
}
