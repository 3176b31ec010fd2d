//! `waitForElementToBeRemoved` should be given a `queryBy*` query.
//!
//! `getBy*` and `findBy*` throw once the element is gone, so the removal is
//! never observed through them.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tree_sitter::Node;
use waitcheck_core::parse::ast::FileId;
use waitcheck_core::semantics::TestFileSemantics;
use waitcheck_core::semantics::callbacks::{callback_statements, classify, is_presence_query};
use waitcheck_core::semantics::node_utils::{call_arguments, is_callback_function, unwrap_transparent};

use crate::rules::Rule;
use crate::rules::finding::RuleFinding;
use crate::rules::testing_library::{Message, async_util_calls, finding_at_node};

pub const PREFER_QUERY_BY_DISAPPEARANCE: Message = Message {
    id: "preferQueryByDisappearance",
    template: "Prefer using queryBy* when waiting for disappearance",
};

#[derive(Debug)]
pub struct PreferQueryByDisappearanceRule {
    removal_utils: Vec<String>,
}

impl PreferQueryByDisappearanceRule {
    pub fn new() -> Self {
        Self {
            removal_utils: vec!["waitForElementToBeRemoved".to_string()],
        }
    }

    fn is_violation(sem: &TestFileSemantics, argument: &Node) -> bool {
        let argument = unwrap_transparent(*argument);
        if is_callback_function(&argument) {
            let statements = callback_statements(&argument);
            return !classify(&sem.parsed, &sem.aliases, &statements).queries.is_empty();
        }
        is_presence_query(&sem.parsed, &sem.aliases, &argument)
    }

    fn check_file(&self, sem: &TestFileSemantics) -> Vec<RuleFinding> {
        let mut findings = Vec::new();
        for call in async_util_calls(sem, &self.removal_utils) {
            let Some(argument) = call_arguments(&call).into_iter().next() else {
                continue;
            };
            if Self::is_violation(sem, &argument) {
                findings.push(finding_at_node(
                    self.id(),
                    PREFER_QUERY_BY_DISAPPEARANCE,
                    BTreeMap::new(),
                    sem,
                    &argument,
                ));
            }
        }
        findings
    }
}

impl Default for PreferQueryByDisappearanceRule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Rule for PreferQueryByDisappearanceRule {
    fn id(&self) -> &'static str {
        "testing_library.prefer_query_by_disappearance"
    }

    fn name(&self) -> &'static str {
        "Prefer queryBy* when waiting for disappearance"
    }

    async fn evaluate(&self, semantics: &[(FileId, Arc<TestFileSemantics>)]) -> Vec<RuleFinding> {
        let mut findings = Vec::new();
        for (_file_id, sem) in semantics {
            findings.extend(self.check_file(sem));
        }
        findings
    }
}
