//! Imports of DOM Testing Library from framework test files.
//!
//! With a configured framework the message names the framework package and
//! the finding carries a patch rewriting the module literal.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use waitcheck_core::parse::ast::FileId;
use waitcheck_core::semantics::{ModuleImport, TestFileSemantics};
use waitcheck_core::types::patch::FilePatch;

use crate::rules::Rule;
use crate::rules::finding::RuleFinding;
use crate::rules::testing_library::Message;

pub const NO_DOM_IMPORT: Message = Message {
    id: "noDomImport",
    template: "import from DOM Testing Library is restricted, import from corresponding Testing Library framework instead",
};

pub const NO_DOM_IMPORT_FRAMEWORK: Message = Message {
    id: "noDomImportFramework",
    template: "import from DOM Testing Library is restricted, import from {{ module }} instead",
};

#[derive(Debug, Default)]
pub struct NoDomImportRule {
    framework: Option<String>,
}

impl NoDomImportRule {
    pub fn new() -> Self {
        Self { framework: None }
    }

    pub fn with_framework(framework: impl Into<String>) -> Self {
        Self {
            framework: Some(framework.into()),
        }
    }

    fn finding_for(&self, sem: &TestFileSemantics, import: &ModuleImport) -> RuleFinding {
        let Some(framework) = self.framework.as_deref() else {
            return RuleFinding::at_location(
                self.id(),
                NO_DOM_IMPORT.id,
                NO_DOM_IMPORT.template,
                BTreeMap::new(),
                &sem.path,
                &import.anchor,
            );
        };

        let module = import.specifier.replacen("dom", framework, 1);
        let literal = import.raw_literal.replacen(&import.specifier, &module, 1);
        let data = BTreeMap::from([("module".to_string(), module)]);

        let mut finding = RuleFinding::at_location(
            self.id(),
            NO_DOM_IMPORT_FRAMEWORK.id,
            NO_DOM_IMPORT_FRAMEWORK.template,
            data,
            &sem.path,
            &import.anchor,
        );
        finding.patch = Some(FilePatch::replace(
            sem.file_id,
            import.literal_start,
            import.literal_end,
            literal,
        ));
        finding
    }
}

#[async_trait]
impl Rule for NoDomImportRule {
    fn id(&self) -> &'static str {
        "testing_library.no_dom_import"
    }

    fn name(&self) -> &'static str {
        "No DOM Testing Library imports"
    }

    async fn evaluate(&self, semantics: &[(FileId, Arc<TestFileSemantics>)]) -> Vec<RuleFinding> {
        let mut findings = Vec::new();
        for (_file_id, sem) in semantics {
            let dom_modules = &sem.settings.dom_modules;
            for import in sem.aliases.imports_from(dom_modules) {
                findings.push(self.finding_for(sem, import));
            }
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing_library::test_support::{parse_semantics, positions};
    use waitcheck_core::types::apply_file_patch;

    #[tokio::test]
    async fn test_dom_imports_are_reported_at_statement() {
        let src = "import { screen } from '@testing-library/dom';\nimport 'dom-testing-library';\nimport { render } from '@testing-library/react';\n";
        let findings = NoDomImportRule::new().evaluate(&parse_semantics(src)).await;
        assert_eq!(positions(&findings), vec![(1, 1, "noDomImport"), (2, 1, "noDomImport")]);
        assert!(findings.iter().all(|f| f.patch.is_none()));
    }

    #[tokio::test]
    async fn test_framework_option_names_module_and_patches_literal() {
        let src = "import { screen } from \"@testing-library/dom\";\n";
        let sem = parse_semantics(src);
        let findings = NoDomImportRule::with_framework("vue").evaluate(&sem).await;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message_id, "noDomImportFramework");
        assert_eq!(
            findings[0].title,
            "import from DOM Testing Library is restricted, import from @testing-library/vue instead"
        );
        let patch = findings[0].patch.as_ref().unwrap();
        assert_eq!(
            apply_file_patch(src, patch),
            "import { screen } from \"@testing-library/vue\";\n"
        );
    }

    #[tokio::test]
    async fn test_legacy_package_and_require_are_rewritten() {
        let src = "const { fireEvent } = require('dom-testing-library');\n";
        let findings = NoDomImportRule::with_framework("react").evaluate(&parse_semantics(src)).await;
        assert_eq!(positions(&findings), vec![(1, 23, "noDomImportFramework")]);
        assert_eq!(
            findings[0].data.get("module").map(String::as_str),
            Some("react-testing-library")
        );
        let patched = apply_file_patch(src, findings[0].patch.as_ref().unwrap());
        assert_eq!(patched, "const { fireEvent } = require('react-testing-library');\n");
    }

    #[tokio::test]
    async fn test_framework_imports_pass() {
        let src = "import { render } from '@testing-library/react';\nconst x = require('@testing-library/user-event');\n";
        assert!(NoDomImportRule::with_framework("react").evaluate(&parse_semantics(src)).await.is_empty());
    }
}
