pub mod finding;
pub mod registry;
pub mod testing_library;

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use waitcheck_core::parse::ast::FileId;
use waitcheck_core::semantics::TestFileSemantics;
use waitcheck_core::types::finding::FindingKind;

use crate::rules::finding::RuleFinding;

/// A single lint rule.
///
/// Rules are pure: they inspect per-file semantics and return findings.
/// Any traversal state (wrapper registries, counters) is created per file
/// inside `evaluate` and dropped with it.
#[async_trait]
pub trait Rule: Send + Sync + Debug {
    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;

    fn kind(&self) -> FindingKind {
        FindingKind::Problem
    }

    /// Evaluate the rule against the provided semantics.
    ///
    /// Returns a list of findings (may be empty if no issues found).
    async fn evaluate(&self, semantics: &[(FileId, Arc<TestFileSemantics>)]) -> Vec<RuleFinding>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct DummyRule;

    #[async_trait]
    impl Rule for DummyRule {
        fn id(&self) -> &'static str {
            "dummy.rule"
        }
        fn name(&self) -> &'static str {
            "Dummy Rule"
        }
        async fn evaluate(&self, _semantics: &[(FileId, Arc<TestFileSemantics>)]) -> Vec<RuleFinding> {
            vec![]
        }
    }

    #[test]
    fn test_rule_trait_methods() {
        let rule = DummyRule;
        assert_eq!(rule.id(), "dummy.rule");
        assert_eq!(rule.name(), "Dummy Rule");
        assert_eq!(rule.kind(), FindingKind::Problem);
    }

    #[tokio::test]
    async fn test_rule_evaluate_empty() {
        let rule = DummyRule;
        let semantics: Vec<(FileId, Arc<TestFileSemantics>)> = vec![];
        let findings = rule.evaluate(&semantics).await;
        assert!(findings.is_empty());
    }
}
