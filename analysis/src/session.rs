use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use waitcheck_core::parse::ast::FileId;
use waitcheck_core::semantics::{TestFileSemantics, build_test_file_semantics};
use waitcheck_core::types::context::SourceFile;
use waitcheck_core::types::finding::Finding;
use waitcheck_core::types::patch::FilePatch;
use waitcheck_core::types::{apply_file_patch, make_unified_diff};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::rules::finding::RuleFinding;
use crate::rules::registry::RuleRegistry;

/// A file that could not be analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// A fix for one file, ready to be written back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFix {
    pub path: String,
    pub patch: FilePatch,
}

/// Outcome of one lint run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// Findings sorted by path, line and column.
    pub findings: Vec<Finding>,
    pub files_analyzed: usize,
    pub skipped_files: Vec<SkippedFile>,
    /// Hunks of every finding that carries a patch, grouped per file.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixes: Vec<FileFix>,
}

impl LintResult {
    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }
}

/// State for a single lint run.
///
/// Pipeline:
/// 1. Parse files and build semantics (in parallel, one file per task)
/// 2. Run all rules
/// 3. Sort, attach diffs and collect fixes
pub struct LintSession {
    pub files: Vec<SourceFile>,
    pub config: Arc<EngineConfig>,
    pub rules: Arc<RuleRegistry>,

    semantics: Vec<(FileId, Arc<TestFileSemantics>)>,
    skipped_files: Vec<SkippedFile>,
}

impl LintSession {
    pub fn new(files: Vec<SourceFile>, config: Arc<EngineConfig>, rules: Arc<RuleRegistry>) -> Self {
        Self {
            files,
            config,
            rules,
            semantics: Vec::new(),
            skipped_files: Vec::new(),
        }
    }

    pub async fn run(&mut self) -> Result<LintResult, EngineError> {
        self.build_all_semantics()?;
        self.run_all_rules().await
    }

    /// Parse every file and build its semantics. Files that fail to parse
    /// are recorded as skipped.
    fn build_all_semantics(&mut self) -> Result<(), EngineError> {
        let settings = Arc::new(self.config.settings.clone());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.max_parallel_files.max(1))
            .build()
            .map_err(|e| EngineError::Internal(anyhow!("failed to build worker pool: {e}")))?;

        let results: Vec<Result<(FileId, TestFileSemantics), SkippedFile>> = pool.install(|| {
            self.files
                .par_iter()
                .enumerate()
                .map(|(index, sf)| {
                    let file_id = FileId((index + 1) as u64);
                    build_test_file_semantics(file_id, sf, Arc::clone(&settings))
                        .map(|sem| (file_id, sem))
                        .map_err(|e| SkippedFile {
                            path: sf.path.clone(),
                            reason: e.to_string(),
                        })
                })
                .collect()
        });

        for result in results {
            match result {
                Ok((file_id, sem)) => self.semantics.push((file_id, Arc::new(sem))),
                Err(skipped) => {
                    tracing::warn!(file = %skipped.path, reason = %skipped.reason, "skipping file");
                    self.skipped_files.push(skipped);
                }
            }
        }

        Ok(())
    }

    async fn run_all_rules(&self) -> Result<LintResult, EngineError> {
        let mut rule_findings: Vec<RuleFinding> = Vec::new();
        for rule in self.rules.all() {
            let mut findings = rule.evaluate(&self.semantics).await;
            tracing::debug!(rule = rule.id(), findings = findings.len(), "rule evaluated");
            rule_findings.append(&mut findings);
        }

        rule_findings.sort_by(compare_rule_findings);

        let by_file: HashMap<FileId, &Arc<TestFileSemantics>> =
            self.semantics.iter().map(|(id, sem)| (*id, sem)).collect();

        let mut fixes: Vec<FileFix> = Vec::new();
        let mut findings = Vec::with_capacity(rule_findings.len());
        for rf in rule_findings {
            let file_id = rf.file_id;
            let patch = rf.patch.clone();
            let mut finding = Finding::from(rf);

            if let (Some(patch), Some(sem)) = (patch, by_file.get(&file_id)) {
                let before = sem.parsed.source.as_str();
                let after = apply_file_patch(before, &patch);
                finding.diff = Some(make_unified_diff(&sem.path, before, &after));

                match fixes.iter_mut().find(|f| f.path == sem.path) {
                    Some(fix) => fix.patch.hunks.extend(patch.hunks),
                    None => fixes.push(FileFix {
                        path: sem.path.clone(),
                        patch,
                    }),
                }
            }

            findings.push(finding);
        }

        Ok(LintResult {
            findings,
            files_analyzed: self.semantics.len(),
            skipped_files: self.skipped_files.clone(),
            fixes,
        })
    }
}

fn compare_rule_findings(a: &RuleFinding, b: &RuleFinding) -> Ordering {
    a.file_path
        .cmp(&b.file_path)
        .then(a.line.cmp(&b.line))
        .then(a.column.cmp(&b.column))
        .then_with(|| a.rule_id.cmp(&b.rule_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::registry::RuleRegistry;

    fn source(path: &str, content: &str) -> SourceFile {
        SourceFile::from_path_and_content(path, content).unwrap()
    }

    fn session(files: Vec<SourceFile>) -> LintSession {
        let config = EngineConfig::default();
        let rules = RuleRegistry::with_builtin_rules(&config.rules);
        LintSession::new(files, Arc::new(config), Arc::new(rules))
    }

    #[tokio::test]
    async fn test_session_empty() {
        let result = session(vec![]).run().await.unwrap();
        assert!(result.findings.is_empty());
        assert_eq!(result.files_analyzed, 0);
    }

    #[tokio::test]
    async fn test_session_sorts_findings_across_files() {
        let code = "import { waitFor } from '@testing-library/react';\ntest('x', () => {\n  waitFor(() => {});\n  waitFor(() => {});\n});\n";
        let result = session(vec![source("b.test.ts", code), source("a.test.ts", code)])
            .run()
            .await
            .unwrap();

        assert_eq!(result.files_analyzed, 2);
        let positions: Vec<(String, u32)> = result
            .findings
            .iter()
            .map(|f| (f.file_path.clone(), f.line))
            .collect();
        assert_eq!(
            positions,
            vec![
                ("a.test.ts".to_string(), 3),
                ("a.test.ts".to_string(), 4),
                ("b.test.ts".to_string(), 3),
                ("b.test.ts".to_string(), 4),
            ]
        );
    }

    #[tokio::test]
    async fn test_session_attaches_diff_and_collects_fixes() {
        let files = vec![source(
            "dom.test.ts",
            "import { screen } from '@testing-library/dom';\n",
        )];
        let mut config = EngineConfig::default();
        config.rules.framework = Some("react".to_string());
        let rules = RuleRegistry::with_builtin_rules(&config.rules);
        let result = LintSession::new(files, Arc::new(config), Arc::new(rules))
            .run()
            .await
            .unwrap();

        assert_eq!(result.findings.len(), 1);
        let diff = result.findings[0].diff.as_deref().unwrap();
        assert!(diff.contains("+import { screen } from '@testing-library/react';"));
        assert_eq!(result.fixes.len(), 1);
        assert_eq!(result.fixes[0].path, "dom.test.ts");
    }

    #[tokio::test]
    async fn test_session_files_without_testing_library_are_inert() {
        let code = "import { waitFor } from './my-waiter';\nwaitFor(() => {});\n";
        let result = session(vec![source("plain.test.ts", code)]).run().await.unwrap();
        assert!(!result.has_findings());
        assert_eq!(result.files_analyzed, 1);
        assert!(result.skipped_files.is_empty());
    }
}
