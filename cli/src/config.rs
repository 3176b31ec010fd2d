//! # Configuration Loading
//!
//! Reads `waitcheck.toml` and layers command line overrides on top.
//!
//! ## File Location
//!
//! `waitcheck.toml` in the working directory, or the file given with
//! `--config`. A missing implicit file means defaults; a missing explicit
//! file is an error.
//!
//! ## Example
//!
//! ```toml
//! max_parallel_files = 8
//!
//! [settings]
//! utils_module = "test-utils"
//!
//! [rules]
//! enabled = ["testing_library.await_async_utils", "testing_library.no_dom_import"]
//! framework = "react"
//! ```

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use waitcheck_analysis::EngineConfig;

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "waitcheck.toml";

/// Values passed on the command line, applied after the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub utils_module: Option<String>,
    pub framework: Option<String>,
    /// Rule ids; non-empty replaces `rules.enabled`.
    pub rules: Vec<String>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut EngineConfig) {
        if let Some(module) = &self.utils_module {
            config.settings.utils_module = Some(module.clone());
        }
        if let Some(framework) = &self.framework {
            config.rules.framework = Some(framework.clone());
        }
        if !self.rules.is_empty() {
            config.rules.enabled = Some(self.rules.clone());
        }
    }
}

/// Parse the contents of a `waitcheck.toml`.
pub fn parse_config(contents: &str) -> Result<EngineConfig> {
    toml::from_str(contents).context("Failed to parse waitcheck configuration")
}

/// Load the engine configuration.
///
/// # Arguments
///
/// * `explicit` - Path from `--config`, which must exist
/// * `project_dir` - Directory searched for `waitcheck.toml` otherwise
pub fn load_config(explicit: Option<&Path>, project_dir: &Path) -> Result<EngineConfig> {
    let path: PathBuf = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = project_dir.join(CONFIG_FILE_NAME);
            if !candidate.is_file() {
                log::debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, project_dir.display());
                return Ok(EngineConfig::default());
            }
            candidate
        }
    };

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = parse_config(&contents).with_context(|| format!("Invalid config file: {}", path.display()))?;
    log::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}
