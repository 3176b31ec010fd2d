//! Side effects (`fireEvent`, `userEvent`) inside `waitFor` callbacks.
//!
//! The callback may run many times, so each side effect inside it is
//! reported.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use waitcheck_core::parse::ast::FileId;
use waitcheck_core::semantics::TestFileSemantics;
use waitcheck_core::semantics::callbacks::{callback_statements, classify, waited_callback};

use crate::rules::Rule;
use crate::rules::finding::RuleFinding;
use crate::rules::testing_library::{Message, async_util_calls, finding_at_node};

pub const NO_SIDE_EFFECTS_WAIT_FOR: Message = Message {
    id: "noSideEffectsWaitFor",
    template: "Avoid using side effects within `waitFor` callback",
};

#[derive(Debug)]
pub struct NoWaitForSideEffectsRule {
    wait_utils: Vec<String>,
}

impl NoWaitForSideEffectsRule {
    pub fn new() -> Self {
        Self {
            wait_utils: vec!["waitFor".to_string()],
        }
    }

    fn check_file(&self, sem: &TestFileSemantics) -> Vec<RuleFinding> {
        let mut findings = Vec::new();
        for call in async_util_calls(sem, &self.wait_utils) {
            let Some(callback) = waited_callback(&call) else {
                continue;
            };
            let statements = callback_statements(&callback);
            let classes = classify(&sem.parsed, &sem.aliases, &statements);
            for side_effect in &classes.side_effects {
                findings.push(finding_at_node(
                    self.id(),
                    NO_SIDE_EFFECTS_WAIT_FOR,
                    BTreeMap::new(),
                    sem,
                    side_effect,
                ));
            }
        }
        findings
    }
}

impl Default for NoWaitForSideEffectsRule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Rule for NoWaitForSideEffectsRule {
    fn id(&self) -> &'static str {
        "testing_library.no_wait_for_side_effects"
    }

    fn name(&self) -> &'static str {
        "No side effects inside waitFor"
    }

    async fn evaluate(&self, semantics: &[(FileId, Arc<TestFileSemantics>)]) -> Vec<RuleFinding> {
        let mut findings = Vec::new();
        for (_file_id, sem) in semantics {
            findings.extend(self.check_file(sem));
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing_library::test_support::{parse_semantics, positions};

    async fn run(src: &str) -> Vec<RuleFinding> {
        NoWaitForSideEffectsRule::new().evaluate(&parse_semantics(src)).await
    }

    #[tokio::test]
    async fn test_fire_event_inside_wait_for_is_reported() {
        let src = "import { waitFor, fireEvent } from '@testing-library/react';\n\
                   await waitFor(() => {\n  fireEvent.click(btn);\n  expect(a).toBe(1);\n});\n";
        let findings = run(src).await;
        assert_eq!(positions(&findings), vec![(3, 3, "noSideEffectsWaitFor")]);
        assert_eq!(findings[0].title, "Avoid using side effects within `waitFor` callback");
    }

    #[tokio::test]
    async fn test_renamed_fire_event_is_reported() {
        let src = "import { waitFor, fireEvent as fe } from '@testing-library/react';\n\
                   await waitFor(() => {\n  fe.keyDown(input, { key: 'Enter' });\n});\n";
        assert_eq!(run(src).await.len(), 1);
    }

    #[tokio::test]
    async fn test_fire_event_from_other_module_is_ignored() {
        let src = "import { waitFor } from '@testing-library/react';\nimport { fireEvent } from 'other-lib';\n\
                   await waitFor(() => {\n  fireEvent.click(btn);\n});\n";
        assert!(run(src).await.is_empty());
    }

    #[tokio::test]
    async fn test_user_event_calls_and_declarations_are_reported() {
        let src = "import { waitFor } from '@testing-library/react';\nimport userEvent from '@testing-library/user-event';\n\
                   await waitFor(async function () {\n  await userEvent.click(btn);\n  const typed = await userEvent.type(input, 'x');\n});\n";
        let findings = run(src).await;
        assert_eq!(
            positions(&findings),
            vec![(4, 3, "noSideEffectsWaitFor"), (5, 3, "noSideEffectsWaitFor")]
        );
    }

    #[tokio::test]
    async fn test_expression_body_side_effect_is_reported() {
        let src = "import { waitFor, fireEvent } from '@testing-library/react';\nawait waitFor(() => fireEvent.click(btn));\n";
        let findings = run(src).await;
        assert_eq!(positions(&findings), vec![(2, 21, "noSideEffectsWaitFor")]);
    }

    #[tokio::test]
    async fn test_side_effects_outside_wait_for_are_fine() {
        let src = "import { waitFor, waitForElementToBeRemoved, fireEvent } from '@testing-library/react';\n\
                   fireEvent.click(btn);\nawait waitFor(() => expect(a).toBe(1));\n\
                   await waitForElementToBeRemoved(() => { fireEvent.click(btn); });\n";
        assert!(run(src).await.is_empty());
    }

    #[tokio::test]
    async fn test_reference_to_fire_event_without_call_is_fine() {
        let src = "import { waitFor, fireEvent } from '@testing-library/react';\nawait waitFor(() => {\n  fireEvent;\n});\n";
        assert!(run(src).await.is_empty());
    }
}
