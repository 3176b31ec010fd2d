//! # Exit Codes
//!
//! Standard exit codes for the waitcheck CLI.
//!
//! These codes follow common Unix conventions and provide meaningful
//! feedback to scripts and CI/CD pipelines.

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// General error (unspecified)
pub const EXIT_ERROR: i32 = 1;

/// Configuration error (unreadable or invalid config, unknown rule)
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Lint found issues (findings detected)
pub const EXIT_FINDINGS_FOUND: i32 = 5;

/// Invalid input (bad arguments, missing paths, etc.)
pub const EXIT_INVALID_INPUT: i32 = 6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_ERROR,
            EXIT_CONFIG_ERROR,
            EXIT_FINDINGS_FOUND,
            EXIT_INVALID_INPUT,
        ];

        for (i, &code1) in codes.iter().enumerate() {
            for (j, &code2) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(code1, code2, "Exit codes {} and {} are not unique", i, j);
                }
            }
        }
    }

    #[test]
    fn test_success_is_zero() {
        assert_eq!(EXIT_SUCCESS, 0);
    }
}
