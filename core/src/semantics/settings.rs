//! Per-file configuration of which names and modules count as testing-library
//! utilities.

use serde::{Deserialize, Serialize};

/// Substring that identifies the official testing-library packages
/// (`@testing-library/*`, `dom-testing-library`, ...).
pub const TESTING_LIBRARY_MODULE_MARKER: &str = "testing-library";

pub const DEFAULT_ASYNC_UTILS: &[&str] = &[
    "waitFor",
    "waitForElementToBeRemoved",
    "wait",
    "waitForElement",
    "waitForDomChange",
];

pub const DEFAULT_DOM_MODULES: &[&str] = &["dom-testing-library", "@testing-library/dom"];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Names and module paths the resolver recognizes.
///
/// All fields have defaults so partial TOML/JSON documents deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestingLibrarySettings {
    /// Custom module re-exporting testing-library (e.g. `test-utils`).
    /// Matched against import specifiers by suffix.
    pub utils_module: Option<String>,

    /// Utilities returning a promise that polls or waits.
    pub async_utils: Vec<String>,

    /// Prefixes of throwing synchronous queries (`getBy*`).
    pub get_query_prefixes: Vec<String>,

    /// Prefixes of nullable synchronous queries (`queryBy*`).
    pub query_query_prefixes: Vec<String>,

    /// Prefixes of asynchronous queries (`findBy*`).
    pub find_query_prefixes: Vec<String>,

    pub fire_event_names: Vec<String>,

    pub user_event_names: Vec<String>,

    /// Module whose default export is the user-event object.
    pub user_event_module: String,

    /// Expectation constructors.
    pub assertion_names: Vec<String>,

    /// Continuation methods that count as handling a promise.
    pub continuation_methods: Vec<String>,

    /// Modules of the framework-agnostic DOM flavour.
    pub dom_modules: Vec<String>,
}

impl Default for TestingLibrarySettings {
    fn default() -> Self {
        Self {
            utils_module: None,
            async_utils: strings(DEFAULT_ASYNC_UTILS),
            get_query_prefixes: strings(&["getBy", "getAllBy"]),
            query_query_prefixes: strings(&["queryBy", "queryAllBy"]),
            find_query_prefixes: strings(&["findBy", "findAllBy"]),
            fire_event_names: strings(&["fireEvent"]),
            user_event_names: strings(&["userEvent"]),
            user_event_module: "@testing-library/user-event".to_string(),
            assertion_names: strings(&["expect"]),
            continuation_methods: strings(&["then", "catch", "finally"]),
            dom_modules: strings(DEFAULT_DOM_MODULES),
        }
    }
}

impl TestingLibrarySettings {
    /// Settings with a custom utilities module.
    pub fn with_utils_module(module: impl Into<String>) -> Self {
        Self {
            utils_module: Some(module.into()),
            ..Self::default()
        }
    }

    /// Whether an import specifier refers to testing-library or to the
    /// configured utilities module.
    pub fn is_testing_library_module(&self, specifier: &str) -> bool {
        if specifier.contains(TESTING_LIBRARY_MODULE_MARKER) {
            return true;
        }
        match self.utils_module.as_deref() {
            Some(custom) if !custom.is_empty() => specifier.ends_with(custom),
            _ => false,
        }
    }

    pub fn is_user_event_module(&self, specifier: &str) -> bool {
        specifier == self.user_event_module
    }

    pub fn is_dom_module(&self, specifier: &str) -> bool {
        self.dom_modules.iter().any(|m| m == specifier)
    }

    pub fn is_async_util_name(&self, name: &str) -> bool {
        self.async_utils.iter().any(|n| n == name)
    }

    pub fn is_fire_event_name(&self, name: &str) -> bool {
        self.fire_event_names.iter().any(|n| n == name)
    }

    pub fn is_user_event_name(&self, name: &str) -> bool {
        self.user_event_names.iter().any(|n| n == name)
    }

    pub fn is_assertion_name(&self, name: &str) -> bool {
        self.assertion_names.iter().any(|n| n == name)
    }

    pub fn is_continuation_method(&self, name: &str) -> bool {
        self.continuation_methods.iter().any(|n| n == name)
    }

    pub fn is_get_query_name(&self, name: &str) -> bool {
        matches_query_prefix(&self.get_query_prefixes, name)
    }

    pub fn is_query_query_name(&self, name: &str) -> bool {
        matches_query_prefix(&self.query_query_prefixes, name)
    }

    pub fn is_find_query_name(&self, name: &str) -> bool {
        matches_query_prefix(&self.find_query_prefixes, name)
    }
}

/// `getByText` matches prefix `getBy`; `getBy` alone or `getByer` with a
/// lowercase continuation does not.
fn matches_query_prefix(prefixes: &[String], name: &str) -> bool {
    prefixes.iter().any(|prefix| {
        name.strip_prefix(prefix.as_str())
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_uppercase())
    })
}
