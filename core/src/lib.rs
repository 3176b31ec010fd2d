//! # waitcheck-core
//!
//! Parsing and semantic resolution for testing-library lint rules.
//!
//! - **Parsing**: tree-sitter based parsing of TypeScript and JavaScript test files
//! - **Semantics**: import aliases, wrapper detection, promise handling and
//!   callback classification
//! - **Types**: findings, patches and source files shared with the engine
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use waitcheck_core::parse::ast::FileId;
//! use waitcheck_core::semantics::build_test_file_semantics;
//! use waitcheck_core::semantics::settings::TestingLibrarySettings;
//! use waitcheck_core::types::context::SourceFile;
//!
//! let source = SourceFile::from_path_and_content(
//!     "Login.test.tsx",
//!     "import { waitFor } from '@testing-library/react';",
//! ).unwrap();
//! let sem = build_test_file_semantics(FileId(1), &source, Arc::new(TestingLibrarySettings::default()))?;
//! assert!(sem.aliases.imports_testing_library());
//! ```

pub mod error;
pub mod parse;
pub mod semantics;
pub mod types;

pub use parse::ast::{FileId, ParsedFile};
pub use semantics::TestFileSemantics;
pub use semantics::settings::TestingLibrarySettings;
pub use types::context::{Language, SourceFile};
