use std::collections::HashSet;
use std::sync::Arc;

use crate::config::RuleOptions;
use crate::rules::Rule;
use crate::rules::testing_library::await_async_query::AwaitAsyncQueryRule;
use crate::rules::testing_library::await_async_utils::AwaitAsyncUtilsRule;
use crate::rules::testing_library::no_dom_import::NoDomImportRule;
use crate::rules::testing_library::no_wait_for_multiple_assertions::NoWaitForMultipleAssertionsRule;
use crate::rules::testing_library::no_wait_for_side_effects::NoWaitForSideEffectsRule;
use crate::rules::testing_library::prefer_query_by_disappearance::PreferQueryByDisappearanceRule;

#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn register(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn all(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    /// Get a rule by ID.
    pub fn get(&self, id: &str) -> Option<Arc<dyn Rule>> {
        self.rules.iter().find(|r| r.id() == id).cloned()
    }

    /// Check if a rule exists.
    pub fn contains(&self, id: &str) -> bool {
        self.rules.iter().any(|r| r.id() == id)
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Create a new registry containing only rules with the given IDs.
    ///
    /// Rules not found are silently ignored.
    pub fn filter_by_ids(&self, ids: &[String]) -> Self {
        let id_set: HashSet<&str> = ids.iter().map(|s| s.as_str()).collect();
        let filtered_rules: Vec<Arc<dyn Rule>> = self
            .rules
            .iter()
            .filter(|r| id_set.contains(r.id()))
            .cloned()
            .collect();

        Self {
            rules: filtered_rules,
        }
    }

    /// Build a registry with the built-in rules, configured by `options`
    /// and narrowed to `options.enabled` when set.
    pub fn with_builtin_rules(options: &RuleOptions) -> Self {
        let mut registry = RuleRegistry::new();

        let await_utils = match &options.async_utils {
            Some(names) => AwaitAsyncUtilsRule::with_async_utils(names.clone()),
            None => AwaitAsyncUtilsRule::new(),
        };
        registry.register(Arc::new(await_utils));
        registry.register(Arc::new(AwaitAsyncQueryRule::new()));
        registry.register(Arc::new(NoWaitForSideEffectsRule::new()));
        registry.register(Arc::new(NoWaitForMultipleAssertionsRule::new()));
        registry.register(Arc::new(PreferQueryByDisappearanceRule::new()));

        let dom_import = match &options.framework {
            Some(framework) => NoDomImportRule::with_framework(framework.clone()),
            None => NoDomImportRule::new(),
        };
        registry.register(Arc::new(dom_import));

        match &options.enabled {
            Some(ids) => registry.filter_by_ids(ids),
            None => registry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rules_are_registered() {
        let registry = RuleRegistry::with_builtin_rules(&RuleOptions::default());
        assert_eq!(registry.len(), 6);
        for id in [
            "testing_library.await_async_utils",
            "testing_library.await_async_query",
            "testing_library.no_wait_for_side_effects",
            "testing_library.no_wait_for_multiple_assertions",
            "testing_library.prefer_query_by_disappearance",
            "testing_library.no_dom_import",
        ] {
            assert!(registry.contains(id), "missing {id}");
        }
    }

    #[test]
    fn test_rule_ids_are_unique() {
        let registry = RuleRegistry::with_builtin_rules(&RuleOptions::default());
        let ids: HashSet<&str> = registry.all().iter().map(|r| r.id()).collect();
        assert_eq!(ids.len(), registry.len());
    }

    #[test]
    fn test_enabled_option_narrows_registry() {
        let options = RuleOptions {
            enabled: Some(vec!["testing_library.no_dom_import".to_string()]),
            ..RuleOptions::default()
        };
        let registry = RuleRegistry::with_builtin_rules(&options);
        assert_eq!(registry.len(), 1);
        assert!(registry.get("testing_library.no_dom_import").is_some());
    }

    #[test]
    fn test_filter_by_ids_ignores_unknown() {
        let registry = RuleRegistry::with_builtin_rules(&RuleOptions::default());
        let filtered = registry.filter_by_ids(&[
            "testing_library.await_async_utils".to_string(),
            "does.not.exist".to_string(),
        ]);
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = RuleRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("anything").is_none());
    }
}
