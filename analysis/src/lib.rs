//! waitcheck-analysis: Rule evaluation and lint engine
//!
//! This crate provides the rule evaluation engine for waitcheck, including:
//! - Built-in testing-library rules over resolved test-file semantics
//! - Engine configuration and rule selection
//! - Session orchestration for lint runs
//!
//! # Example
//!
//! ```ignore
//! use waitcheck_analysis::Engine;
//!
//! let engine = Engine::with_default_config();
//! let result = engine.analyze(files).await?;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use waitcheck_core::parse::ast::FileId;
pub use waitcheck_core::types::context::{Language, SourceFile};
pub use waitcheck_core::types::finding::{Finding, FindingKind, Severity};

// Re-export main engine types
pub use config::{EngineConfig, RuleOptions};
pub use engine::Engine;
pub use error::EngineError;
pub use rules::Rule;
pub use rules::registry::RuleRegistry;
pub use session::{FileFix, LintResult, SkippedFile};
