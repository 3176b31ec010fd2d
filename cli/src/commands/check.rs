//! # Check Command
//!
//! Lints the given paths and reports findings.
//!
//! ## Usage
//!
//! ```bash
//! waitcheck check src/
//! waitcheck check --framework react --fix
//! waitcheck check --rule testing_library.await_async_utils --output json
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use waitcheck_analysis::{Engine, EngineError, LintResult};

use crate::config::{ConfigOverrides, load_config};
use crate::errors::{display_config_error, display_error, display_validation_error, display_warning};
use crate::exit_codes::*;
use crate::output::{OutputFormat, render};
use crate::session::{FileDiscovery, PatchApplier, PatchStats};

/// Arguments for the check command
#[derive(Debug, Clone)]
pub struct CheckArgs {
    /// Files or directories to lint; empty means the current directory
    pub paths: Vec<PathBuf>,
    /// Explicit configuration file
    pub config: Option<PathBuf>,
    pub overrides: ConfigOverrides,
    pub output: OutputFormat,
    /// Write fixes back to the files
    pub fix: bool,
    /// Print the diff of every applied fix
    pub verbose: bool,
}

/// Execute the check command
///
/// # Returns
///
/// * `Ok(EXIT_SUCCESS)` - No findings, or every finding was fixed
/// * `Ok(EXIT_FINDINGS_FOUND)` - Findings remain
/// * `Ok(EXIT_CONFIG_ERROR)` - Configuration error
/// * `Ok(EXIT_INVALID_INPUT)` - A path does not exist
/// * `Ok(EXIT_ERROR)` - Analysis failed
pub async fn execute(args: CheckArgs) -> Result<i32> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;

    let mut config = match load_config(args.config.as_deref(), &current_dir) {
        Ok(config) => config,
        Err(e) => {
            display_config_error(&format!("{:#}", e));
            return Ok(EXIT_CONFIG_ERROR);
        }
    };
    args.overrides.apply(&mut config);

    let engine = match Engine::from_config(config) {
        Ok(engine) => engine,
        Err(e) => {
            display_config_error(&e.to_string());
            return Ok(EXIT_CONFIG_ERROR);
        }
    };

    let roots = if args.paths.is_empty() {
        vec![current_dir.clone()]
    } else {
        args.paths.clone()
    };
    let discovered = match FileDiscovery::new(roots).discover() {
        Ok(discovered) => discovered,
        Err(e) => {
            display_validation_error(&format!("{:#}", e));
            return Ok(EXIT_INVALID_INPUT);
        }
    };

    if discovered.is_empty() {
        display_warning("No TypeScript or JavaScript files found");
        return Ok(EXIT_SUCCESS);
    }

    let originals: HashMap<String, String> = discovered
        .files
        .iter()
        .map(|f| (f.path.clone(), f.content.clone()))
        .collect();
    log::debug!("Linting {} files with {} rules", originals.len(), engine.rules().len());

    let mut result = match engine.analyze(discovered.files).await {
        Ok(result) => result,
        Err(EngineError::Config(e)) => {
            display_config_error(&e.to_string());
            return Ok(EXIT_CONFIG_ERROR);
        }
        Err(e) => {
            display_error(&format!("Analysis failed: {}", e));
            return Ok(EXIT_ERROR);
        }
    };
    result.skipped_files.extend(discovered.unreadable);

    let remaining = if args.fix && !result.fixes.is_empty() {
        let stats = PatchApplier::new(&current_dir).apply_fixes(&result.fixes, &originals, false)?;
        report_fixes(&stats, args.verbose);
        unfixed_count(&result, &stats)
    } else {
        result.findings.len()
    };

    let rendered = render(&result, args.output, !args.fix)?;
    print!("{}", rendered);

    if remaining > 0 {
        Ok(EXIT_FINDINGS_FOUND)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Findings not covered by a fix that was written.
fn unfixed_count(result: &LintResult, stats: &PatchStats) -> usize {
    result
        .findings
        .iter()
        .filter(|f| f.diff.is_none() || !stats.modified_files.contains(&f.file_path))
        .count()
}

fn report_fixes(stats: &PatchStats, verbose: bool) {
    if !stats.modified_files.is_empty() {
        eprintln!(
            "{} Applied {} fix{} to {} file{}",
            "✓".green().bold(),
            stats.applied,
            if stats.applied == 1 { "" } else { "es" },
            stats.modified_files.len(),
            if stats.modified_files.len() == 1 { "" } else { "s" }
        );
        for file in &stats.modified_files {
            eprintln!("  {} {}", "→".dimmed(), file);
        }
    }

    if verbose {
        for diff in &stats.diffs {
            for line in diff.lines() {
                if line.starts_with('+') && !line.starts_with("+++") {
                    eprintln!("   {}", line.green());
                } else if line.starts_with('-') && !line.starts_with("---") {
                    eprintln!("   {}", line.red());
                } else {
                    eprintln!("   {}", line.dimmed());
                }
            }
        }
    }

    if !stats.is_success() {
        eprintln!("{} Some fixes failed:", "⚠".yellow().bold());
        for error in &stats.errors {
            eprintln!("  {} {}", "→".red(), error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(paths: Vec<PathBuf>) -> CheckArgs {
        CheckArgs {
            paths,
            config: None,
            overrides: ConfigOverrides::default(),
            output: OutputFormat::Json,
            fix: false,
            verbose: false,
        }
    }

    #[tokio::test]
    async fn test_findings_give_findings_exit_code() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("a.test.ts"),
            "import { waitFor } from '@testing-library/react';\ntest('x', () => { waitFor(check); });\n",
        )
        .unwrap();
        let code = execute(args(vec![temp_dir.path().to_path_buf()])).await.unwrap();
        assert_eq!(code, EXIT_FINDINGS_FOUND);
    }

    #[tokio::test]
    async fn test_clean_files_succeed() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("a.test.ts"),
            "import { waitFor } from '@testing-library/react';\ntest('x', async () => { await waitFor(check); });\n",
        )
        .unwrap();
        let code = execute(args(vec![temp_dir.path().to_path_buf()])).await.unwrap();
        assert_eq!(code, EXIT_SUCCESS);
    }

    #[tokio::test]
    async fn test_missing_path_is_invalid_input() {
        let temp_dir = TempDir::new().unwrap();
        let code = execute(args(vec![temp_dir.path().join("missing")])).await.unwrap();
        assert_eq!(code, EXIT_INVALID_INPUT);
    }

    #[tokio::test]
    async fn test_unknown_rule_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut check = args(vec![temp_dir.path().to_path_buf()]);
        check.overrides.rules = vec!["testing_library.nope".to_string()];
        assert_eq!(execute(check).await.unwrap(), EXIT_CONFIG_ERROR);
    }

    #[tokio::test]
    async fn test_explicit_config_file_is_used() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().join("lint.toml");
        fs::write(&config, "[rules]\nenabled = [\"testing_library.no_dom_import\"]\n").unwrap();
        fs::write(
            temp_dir.path().join("a.test.ts"),
            "import { waitFor } from '@testing-library/react';\nwaitFor(check);\n",
        )
        .unwrap();

        let mut check = args(vec![temp_dir.path().join("a.test.ts")]);
        check.config = Some(config);
        assert_eq!(execute(check).await.unwrap(), EXIT_SUCCESS);
    }

    #[tokio::test]
    async fn test_fix_rewrites_dom_import() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("dom.test.ts");
        fs::write(&file, "import { screen } from '@testing-library/dom';\n").unwrap();

        let mut check = args(vec![temp_dir.path().to_path_buf()]);
        check.fix = true;
        check.overrides.framework = Some("react".to_string());
        check.overrides.rules = vec!["testing_library.no_dom_import".to_string()];

        assert_eq!(execute(check).await.unwrap(), EXIT_SUCCESS);
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "import { screen } from '@testing-library/react';\n"
        );
    }

    #[tokio::test]
    async fn test_no_files_is_success() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("notes.md"), "nothing to lint").unwrap();
        assert_eq!(execute(args(vec![temp_dir.path().to_path_buf()])).await.unwrap(), EXIT_SUCCESS);
    }
}
