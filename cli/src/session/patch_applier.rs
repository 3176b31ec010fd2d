//! Patch Applier Module
//!
//! Writes the fixes of a lint run back to the source files.
//!
//! Each `FileFix` holds byte-offset hunks against the contents that were
//! analyzed; a file whose contents changed since then is skipped.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use waitcheck::session::patch_applier::PatchApplier;
//!
//! let applier = PatchApplier::new(&workspace_path);
//! let stats = applier.apply_fixes(&result.fixes, &originals, dry_run)?;
//! println!("Applied {} patches", stats.applied);
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use waitcheck_analysis::FileFix;
use waitcheck_core::types::{apply_file_patch, make_unified_diff};

/// Statistics from a patch application session
#[derive(Debug, Default, Clone)]
pub struct PatchStats {
    /// Number of hunks applied (or that would be, in dry-run mode)
    pub applied: usize,
    /// Number of files that failed to patch
    pub failed: usize,
    /// Files that were modified
    pub modified_files: Vec<String>,
    /// Unified diff per patched file
    pub diffs: Vec<String>,
    /// Error messages for failed patches
    pub errors: Vec<String>,
}

impl PatchStats {
    /// Returns true if all patches were applied successfully
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Applies lint fixes to source files.
pub struct PatchApplier {
    /// Directory relative paths are resolved against
    workspace_path: PathBuf,
}

impl PatchApplier {
    pub fn new(workspace_path: &Path) -> Self {
        Self {
            workspace_path: workspace_path.to_path_buf(),
        }
    }

    /// Apply `fixes`.
    ///
    /// # Arguments
    ///
    /// * `fixes` - Per-file patches from the lint result
    /// * `originals` - Contents each file had when it was analyzed, by path
    /// * `dry_run` - If true, compute diffs without writing
    pub fn apply_fixes(
        &self,
        fixes: &[FileFix],
        originals: &HashMap<String, String>,
        dry_run: bool,
    ) -> Result<PatchStats> {
        let mut stats = PatchStats::default();

        for fix in fixes {
            match self.apply_fix(fix, originals.get(&fix.path), dry_run) {
                Ok(Some(diff)) => {
                    stats.applied += fix.patch.hunks.len();
                    stats.diffs.push(diff);
                    if !dry_run {
                        stats.modified_files.push(fix.path.clone());
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    log::debug!("Failed to patch {}: {:#}", fix.path, e);
                    stats.failed += 1;
                    stats.errors.push(format!("{}: {:#}", fix.path, e));
                }
            }
        }

        Ok(stats)
    }

    /// Returns the diff of the change, or `None` when the patch is a no-op.
    fn apply_fix(&self, fix: &FileFix, original: Option<&String>, dry_run: bool) -> Result<Option<String>> {
        let full_path = self.workspace_path.join(&fix.path);
        let current = fs::read_to_string(&full_path)
            .with_context(|| format!("Failed to read {}", full_path.display()))?;

        if let Some(original) = original {
            if *original != current {
                anyhow::bail!("file changed since it was analyzed");
            }
        }

        let patched = apply_file_patch(&current, &fix.patch);
        if patched == current {
            return Ok(None);
        }

        if !dry_run {
            fs::write(&full_path, &patched)
                .with_context(|| format!("Failed to write {}", full_path.display()))?;
        }
        Ok(Some(make_unified_diff(&fix.path, &current, &patched)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use waitcheck_core::parse::ast::FileId;
    use waitcheck_core::types::patch::FilePatch;

    const SOURCE: &str = "import { screen } from '@testing-library/dom';\n";

    fn dom_fix(path: &str) -> FileFix {
        let start = SOURCE.find('\'').unwrap();
        let end = SOURCE.rfind('\'').unwrap() + 1;
        FileFix {
            path: path.to_string(),
            patch: FilePatch::replace(FileId(1), start, end, "'@testing-library/react'"),
        }
    }

    fn originals(path: &str, contents: &str) -> HashMap<String, String> {
        HashMap::from([(path.to_string(), contents.to_string())])
    }

    #[test]
    fn test_apply_fix_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.test.ts"), SOURCE).unwrap();

        let applier = PatchApplier::new(temp_dir.path());
        let stats = applier
            .apply_fixes(&[dom_fix("a.test.ts")], &originals("a.test.ts", SOURCE), false)
            .unwrap();

        assert!(stats.is_success());
        assert_eq!(stats.applied, 1);
        assert_eq!(stats.modified_files, vec!["a.test.ts".to_string()]);
        let written = fs::read_to_string(temp_dir.path().join("a.test.ts")).unwrap();
        assert_eq!(written, "import { screen } from '@testing-library/react';\n");
        assert!(stats.diffs[0].contains("+import { screen } from '@testing-library/react';"));
    }

    #[test]
    fn test_dry_run_leaves_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.test.ts"), SOURCE).unwrap();

        let applier = PatchApplier::new(temp_dir.path());
        let stats = applier
            .apply_fixes(&[dom_fix("a.test.ts")], &originals("a.test.ts", SOURCE), true)
            .unwrap();

        assert_eq!(stats.applied, 1);
        assert!(stats.modified_files.is_empty());
        assert_eq!(stats.diffs.len(), 1);
        assert_eq!(fs::read_to_string(temp_dir.path().join("a.test.ts")).unwrap(), SOURCE);
    }

    #[test]
    fn test_changed_file_is_not_patched() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.test.ts"), "// edited\n").unwrap();

        let applier = PatchApplier::new(temp_dir.path());
        let stats = applier
            .apply_fixes(&[dom_fix("a.test.ts")], &originals("a.test.ts", SOURCE), false)
            .unwrap();

        assert!(!stats.is_success());
        assert_eq!(stats.failed, 1);
        assert_eq!(fs::read_to_string(temp_dir.path().join("a.test.ts")).unwrap(), "// edited\n");
    }

    #[test]
    fn test_missing_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let applier = PatchApplier::new(temp_dir.path());
        let stats = applier.apply_fixes(&[dom_fix("gone.test.ts")], &HashMap::new(), false).unwrap();
        assert_eq!(stats.failed, 1);
        assert!(stats.errors[0].starts_with("gone.test.ts"));
    }
}
