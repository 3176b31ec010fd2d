use std::sync::Arc;

use arc_swap::ArcSwap;
use waitcheck_core::types::context::SourceFile;

use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError};
use crate::rules::registry::RuleRegistry;
use crate::session::{LintResult, LintSession};

/// The waitcheck lint engine.
///
/// Thread-safe and designed for concurrent use. Configuration and rules can
/// be hot-swapped via `ArcSwap`; a running analysis keeps the snapshot it
/// started with.
///
/// # Usage
///
/// ```rust,ignore
/// use waitcheck_analysis::Engine;
/// use waitcheck_core::SourceFile;
///
/// let engine = Engine::with_default_config();
/// let files = vec![SourceFile::from_path_and_content("a.test.ts", src).unwrap()];
///
/// // Run every configured rule
/// let result = engine.analyze(files).await?;
///
/// // Or a subset by id
/// let result = engine.analyze_with_rules(files, &["testing_library.await_async_utils".into()]).await?;
/// ```
pub struct Engine {
    pub config: ArcSwap<EngineConfig>,
    pub rule_registry: ArcSwap<RuleRegistry>,
}

impl Engine {
    /// Create a new engine with the given configuration and rules.
    pub fn new(config: EngineConfig, rule_registry: RuleRegistry) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            rule_registry: ArcSwap::from_pointee(rule_registry),
        }
    }

    /// Default configuration and the built-in rules.
    pub fn with_default_config() -> Self {
        let config = EngineConfig::default();
        let registry = RuleRegistry::with_builtin_rules(&config.rules);
        Self::new(config, registry)
    }

    /// Validate `config` and build the built-in rules it selects.
    pub fn from_config(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let registry = RuleRegistry::with_builtin_rules(&config.rules);
        check_rule_ids(&registry, config.rules.enabled.as_deref().unwrap_or_default())?;
        Ok(Self::new(config, registry))
    }

    /// Lint `files` with every rule in the registry.
    ///
    /// The engine is stateless between calls; all state lives inside the call.
    pub async fn analyze(&self, files: Vec<SourceFile>) -> Result<LintResult, EngineError> {
        let config = self.config.load_full();
        config.validate()?;
        let rules = self.rule_registry.load_full();
        LintSession::new(files, config, rules).run().await
    }

    /// Lint `files` with the rules named in `rule_ids`.
    ///
    /// Unknown ids are a configuration error.
    pub async fn analyze_with_rules(
        &self,
        files: Vec<SourceFile>,
        rule_ids: &[String],
    ) -> Result<LintResult, EngineError> {
        let config = self.config.load_full();
        config.validate()?;
        let full_registry = self.rule_registry.load_full();
        check_rule_ids(&full_registry, rule_ids)?;
        let filtered_registry = full_registry.filter_by_ids(rule_ids);
        LintSession::new(files, config, Arc::new(filtered_registry)).run().await
    }

    /// Swap in a new configuration and the rules it selects.
    pub fn update_config(&self, config: EngineConfig) -> Result<(), EngineError> {
        config.validate()?;
        let registry = RuleRegistry::with_builtin_rules(&config.rules);
        check_rule_ids(&registry, config.rules.enabled.as_deref().unwrap_or_default())?;
        self.rule_registry.store(Arc::new(registry));
        self.config.store(Arc::new(config));
        tracing::debug!("engine configuration updated");
        Ok(())
    }

    /// Get the rule registry.
    pub fn rules(&self) -> arc_swap::Guard<Arc<RuleRegistry>> {
        self.rule_registry.load()
    }
}

fn check_rule_ids(registry: &RuleRegistry, ids: &[String]) -> Result<(), ConfigError> {
    match ids.iter().find(|id| !registry.contains(id)) {
        Some(unknown) => Err(ConfigError::UnknownRule(unknown.clone())),
        None => Ok(()),
    }
}
