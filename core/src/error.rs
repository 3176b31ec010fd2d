use thiserror::Error;

/// Errors that occur while parsing individual files.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse {file_path}: {source}")]
    File {
        file_path: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_parse_error_display_includes_path_and_cause() {
        let err = ParseError::File {
            file_path: "login.test.ts".to_string(),
            source: anyhow::anyhow!("grammar rejected input"),
        };
        let msg = err.to_string();
        assert!(msg.contains("login.test.ts"));
        assert!(msg.contains("grammar rejected input"));
    }

    #[test]
    fn test_parse_error_exposes_source() {
        let err = ParseError::File {
            file_path: "x.test.ts".to_string(),
            source: anyhow::anyhow!("boom"),
        };
        assert!(err.source().is_some());
    }
}
