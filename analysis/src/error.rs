use thiserror::Error;

pub use waitcheck_core::error::ParseError;

/// Top-level error type exposed by the engine.
///
/// This is what bubbles out to CLI and library callers.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("parsing error: {0}")]
    Parse(#[from] ParseError),

    #[error("rule evaluation error: {0}")]
    Rule(#[from] RuleError),

    /// "Catch-all" for unexpected internal failures.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Errors in engine or rule configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown rule id: {0}")]
    UnknownRule(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Errors executing rules.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule {rule_id} failed: {source}")]
    RuleFailed {
        rule_id: String,
        #[source]
        source: anyhow::Error,
    },
}
