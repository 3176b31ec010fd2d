//! More than one assertion inside a `waitFor` callback.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use waitcheck_core::parse::ast::FileId;
use waitcheck_core::semantics::TestFileSemantics;
use waitcheck_core::semantics::callbacks::{callback_statements, classify, has_block_body, waited_callback};
use waitcheck_core::types::finding::{FindingKind, Severity};

use crate::rules::Rule;
use crate::rules::finding::RuleFinding;
use crate::rules::testing_library::{Message, async_util_calls, finding_at_node};

pub const NO_WAIT_FOR_MULTIPLE_ASSERTION: Message = Message {
    id: "noWaitForMultipleAssertion",
    template: "Avoid using multiple assertions within `waitFor` callback",
};

#[derive(Debug)]
pub struct NoWaitForMultipleAssertionsRule {
    wait_utils: Vec<String>,
}

impl NoWaitForMultipleAssertionsRule {
    pub fn new() -> Self {
        Self {
            wait_utils: vec!["waitFor".to_string()],
        }
    }

    fn check_file(&self, sem: &TestFileSemantics) -> Vec<RuleFinding> {
        let mut findings = Vec::new();
        for call in async_util_calls(sem, &self.wait_utils) {
            let Some(callback) = waited_callback(&call).filter(has_block_body) else {
                continue;
            };
            let classes = classify(&sem.parsed, &sem.aliases, &callback_statements(&callback));

            // The first assertion is allowed.
            for assertion in classes.assertions.iter().skip(1) {
                let mut finding =
                    finding_at_node(self.id(), NO_WAIT_FOR_MULTIPLE_ASSERTION, BTreeMap::new(), sem, assertion);
                finding.kind = self.kind();
                finding.severity = Severity::Low;
                findings.push(finding);
            }
        }
        findings
    }
}

impl Default for NoWaitForMultipleAssertionsRule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Rule for NoWaitForMultipleAssertionsRule {
    fn id(&self) -> &'static str {
        "testing_library.no_wait_for_multiple_assertions"
    }

    fn name(&self) -> &'static str {
        "Single assertion per waitFor"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::Suggestion
    }

    async fn evaluate(&self, semantics: &[(FileId, Arc<TestFileSemantics>)]) -> Vec<RuleFinding> {
        let mut findings = Vec::new();
        for (_file_id, sem) in semantics {
            findings.extend(self.check_file(sem));
        }
        findings
    }
}
