use serde::{Deserialize, Serialize};
use waitcheck_core::semantics::settings::TestingLibrarySettings;

use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on files analyzed concurrently.
    pub max_parallel_files: usize,

    /// Shared testing-library settings (module names, utility names).
    pub settings: TestingLibrarySettings,

    pub rules: RuleOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_parallel_files: 16,
            settings: TestingLibrarySettings::default(),
            rules: RuleOptions::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_parallel_files == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_parallel_files".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some(framework) = &self.rules.framework {
            if framework.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "rules.framework".to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Per-rule options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleOptions {
    /// Rule ids to run; `None` runs every built-in rule.
    pub enabled: Option<Vec<String>>,

    /// Async utilities checked by `await_async_utils`; `None` checks all.
    pub async_utils: Option<Vec<String>>,

    /// Framework suggested by `no_dom_import` (`react`, `vue`, ...).
    pub framework: Option<String>,
}
