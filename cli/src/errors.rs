//! # Error Handling
//!
//! User-friendly error display functions for the waitcheck CLI.

use colored::Colorize;

/// Display a configuration error with helpful suggestions
///
/// # Arguments
///
/// * `message` - The error message to display
pub fn display_config_error(message: &str) {
    eprintln!("{} Configuration error: {}", "✗".red().bold(), message);
    eprintln!();
    eprintln!("{}", "Possible causes:".yellow());
    eprintln!("  • waitcheck.toml is not valid TOML");
    eprintln!("  • An unknown rule id was passed to --rule or rules.enabled");
    eprintln!();
    eprintln!(
        "{} Run `waitcheck check --help` to see the available options.",
        "Tip:".cyan().bold()
    );
}

/// Display a validation error with helpful suggestions
///
/// # Arguments
///
/// * `message` - The error message to display
pub fn display_validation_error(message: &str) {
    eprintln!("{} Invalid input: {}", "✗".red().bold(), message);
    eprintln!();
    eprintln!(
        "{} Check the paths and options and try again.",
        "Tip:".cyan().bold()
    );
}

/// Display a generic error
pub fn display_error(message: &str) {
    eprintln!("{} Error: {}", "✗".red().bold(), message);
}

/// Display a warning
pub fn display_warning(message: &str) {
    eprintln!("{} Warning: {}", "⚠".yellow().bold(), message);
}

#[cfg(test)]
mod tests {
    // These only check that nothing panics; output goes to the terminal.

    use super::*;

    #[test]
    fn test_display_config_error_does_not_panic() {
        display_config_error("expected `=` at line 2");
    }

    #[test]
    fn test_display_validation_error_does_not_panic() {
        display_validation_error("path does not exist: src/missing");
    }

    #[test]
    fn test_display_error_does_not_panic() {
        display_error("Something went wrong");
    }

    #[test]
    fn test_display_warning_does_not_panic() {
        display_warning("No test files found");
    }
}
