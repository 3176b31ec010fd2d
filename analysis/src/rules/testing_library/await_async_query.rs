//! Promises returned from `findBy*` queries must be handled.

use std::sync::Arc;

use async_trait::async_trait;
use waitcheck_core::parse::ast::FileId;
use waitcheck_core::semantics::TestFileSemantics;

use crate::rules::Rule;
use crate::rules::finding::RuleFinding;
use crate::rules::testing_library::{Message, PromiseSource, unhandled_promise_findings};

pub const AWAIT_ASYNC_QUERY: Message = Message {
    id: "awaitAsyncQuery",
    template: "promise returned from `{{ name }}` query must be handled",
};

pub const ASYNC_QUERY_WRAPPER: Message = Message {
    id: "asyncQueryWrapper",
    template: "promise returned from `{{ name }}` wrapper over async query must be handled",
};

#[derive(Debug, Default)]
pub struct AwaitAsyncQueryRule;

impl AwaitAsyncQueryRule {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Rule for AwaitAsyncQueryRule {
    fn id(&self) -> &'static str {
        "testing_library.await_async_query"
    }

    fn name(&self) -> &'static str {
        "Async queries must be awaited"
    }

    async fn evaluate(&self, semantics: &[(FileId, Arc<TestFileSemantics>)]) -> Vec<RuleFinding> {
        semantics
            .iter()
            .flat_map(|(_, sem)| {
                unhandled_promise_findings(
                    self.id(),
                    sem,
                    PromiseSource::AsyncQuery,
                    AWAIT_ASYNC_QUERY,
                    ASYNC_QUERY_WRAPPER,
                )
            })
            .collect()
    }
}
