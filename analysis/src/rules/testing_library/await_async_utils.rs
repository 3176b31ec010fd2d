//! Promises returned from async utilities must be handled.
//!
//! Detects `waitFor(...)`-style calls (and functions that return them) whose
//! result is neither awaited, chained, returned, nor read by a handled
//! expression later on.

use std::sync::Arc;

use async_trait::async_trait;
use waitcheck_core::parse::ast::FileId;
use waitcheck_core::semantics::TestFileSemantics;

use crate::rules::Rule;
use crate::rules::finding::RuleFinding;
use crate::rules::testing_library::{Message, PromiseSource, unhandled_promise_findings};

pub const AWAIT_ASYNC_UTIL: Message = Message {
    id: "awaitAsyncUtil",
    template: "Promise returned from `{{ name }}` must be handled",
};

pub const ASYNC_UTIL_WRAPPER: Message = Message {
    id: "asyncUtilWrapper",
    template: "Promise returned from {{ name }} wrapper over async util must be handled",
};

#[derive(Debug, Default)]
pub struct AwaitAsyncUtilsRule {
    /// Canonical names to check; `None` checks every configured async util.
    async_utils: Option<Vec<String>>,
}

impl AwaitAsyncUtilsRule {
    pub fn new() -> Self {
        Self { async_utils: None }
    }

    pub fn with_async_utils(names: Vec<String>) -> Self {
        Self {
            async_utils: Some(names),
        }
    }

    fn check_file(&self, sem: &TestFileSemantics) -> Vec<RuleFinding> {
        unhandled_promise_findings(
            self.id(),
            sem,
            PromiseSource::AsyncUtil(self.async_utils.as_deref()),
            AWAIT_ASYNC_UTIL,
            ASYNC_UTIL_WRAPPER,
        )
    }
}

#[async_trait]
impl Rule for AwaitAsyncUtilsRule {
    fn id(&self) -> &'static str {
        "testing_library.await_async_utils"
    }

    fn name(&self) -> &'static str {
        "Async utils must be awaited"
    }

    async fn evaluate(&self, semantics: &[(FileId, Arc<TestFileSemantics>)]) -> Vec<RuleFinding> {
        let mut findings = Vec::new();
        for (_file_id, sem) in semantics {
            findings.extend(self.check_file(sem));
        }
        findings
    }
}
