//! Rendering of lint results.

use std::fmt::Write as _;

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use waitcheck_analysis::{Finding, LintResult, Severity};

/// Output format options for the check command
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per finding plus a summary (default)
    #[default]
    Basic,
    /// JSON output format
    Json,
}

/// Render `result` in `format`.
pub fn render(result: &LintResult, format: OutputFormat, fix_hint: bool) -> Result<String> {
    match format {
        OutputFormat::Basic => Ok(render_basic(result, fix_hint)),
        OutputFormat::Json => render_json(result),
    }
}

/// `path:line:col  severity  message  rule` lines followed by a summary.
pub fn render_basic(result: &LintResult, fix_hint: bool) -> String {
    let mut out = String::new();

    for finding in &result.findings {
        let _ = writeln!(out, "{}", finding_line(finding));
    }

    for skipped in &result.skipped_files {
        let _ = writeln!(
            out,
            "{} {} {}",
            "⚠".yellow().bold(),
            skipped.path.cyan(),
            format!("skipped: {}", skipped.reason).dimmed()
        );
    }

    if !result.findings.is_empty() || !result.skipped_files.is_empty() {
        out.push('\n');
    }

    let files = format!(
        "{} file{}",
        result.files_analyzed,
        if result.files_analyzed == 1 { "" } else { "s" }
    );

    let total = result.findings.len();
    if total == 0 {
        let _ = writeln!(out, "{} No issues found in {}", "✓".bright_green().bold(), files);
        return out;
    }

    let _ = write!(
        out,
        "{} Found {} issue{} in {}",
        "⚠".yellow().bold(),
        total.to_string().bright_yellow(),
        if total == 1 { "" } else { "s" },
        files
    );
    let fixable = result.fixes.len();
    if fix_hint && fixable > 0 {
        let _ = write!(
            out,
            "  {}",
            format!(
                "{} file{} fixable, run with --fix",
                fixable,
                if fixable == 1 { "" } else { "s" }
            )
            .dimmed()
        );
    }
    out.push('\n');
    out
}

fn finding_line(finding: &Finding) -> String {
    let severity = match finding.severity {
        Severity::High => finding.severity.as_str().red(),
        Severity::Medium => finding.severity.as_str().yellow(),
        Severity::Low => finding.severity.as_str().blue(),
        Severity::Info => finding.severity.as_str().white(),
    };
    format!(
        "{}  {}  {}  {}",
        format!("{}:{}:{}", finding.file_path, finding.line, finding.column).cyan(),
        severity,
        finding.title,
        finding.rule_id.dimmed()
    )
}

pub fn render_json(result: &LintResult) -> Result<String> {
    let output = serde_json::json!({
        "findings_count": result.findings.len(),
        "findings": result.findings,
        "files_analyzed": result.files_analyzed,
        "skipped_files": result.skipped_files,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use waitcheck_analysis::{FindingKind, SkippedFile};

    fn finding() -> Finding {
        Finding {
            id: "f1".to_string(),
            rule_id: "testing_library.await_async_utils".to_string(),
            message_id: "awaitAsyncUtil".to_string(),
            kind: FindingKind::Problem,
            title: "Promise returned from `waitFor` must be handled".to_string(),
            description: String::new(),
            severity: Severity::High,
            data: BTreeMap::from([("name".to_string(), "waitFor".to_string())]),
            file_path: "src/app.test.tsx".to_string(),
            line: 3,
            column: 5,
            end_line: 3,
            end_column: 12,
            byte_range: (40, 47),
            diff: None,
        }
    }

    fn result(findings: Vec<Finding>) -> LintResult {
        LintResult {
            findings,
            files_analyzed: 2,
            ..LintResult::default()
        }
    }

    #[test]
    fn test_basic_lists_findings_and_summary() {
        colored::control::set_override(false);
        let out = render_basic(&result(vec![finding()]), false);
        assert!(out.starts_with(
            "src/app.test.tsx:3:5  high  Promise returned from `waitFor` must be handled  testing_library.await_async_utils\n"
        ));
        assert!(out.ends_with("Found 1 issue in 2 files\n"));
    }

    #[test]
    fn test_basic_clean_run() {
        colored::control::set_override(false);
        let out = render_basic(&result(vec![]), true);
        assert_eq!(out, "✓ No issues found in 2 files\n");
    }

    #[test]
    fn test_basic_mentions_skipped_files() {
        colored::control::set_override(false);
        let mut lint = result(vec![]);
        lint.skipped_files.push(SkippedFile {
            path: "broken.test.ts".to_string(),
            reason: "parse error".to_string(),
        });
        let out = render_basic(&lint, false);
        assert!(out.contains("broken.test.ts skipped: parse error"));
    }

    #[test]
    fn test_json_shape() {
        let out = render_json(&result(vec![finding(), finding()])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["findings_count"], 2);
        assert_eq!(value["files_analyzed"], 2);
        assert_eq!(value["findings"][0]["message_id"], "awaitAsyncUtil");
        assert_eq!(value["findings"][0]["data"]["name"], "waitFor");
        assert!(value["skipped_files"].as_array().unwrap().is_empty());
    }
}
