//! Rules for test files written against testing-library.
//!
//! All rules resolve names through the per-file alias table, so a utility
//! only counts when it was imported from a recognized module.

pub mod await_async_query;
pub mod await_async_utils;
pub mod no_dom_import;
pub mod no_wait_for_multiple_assertions;
pub mod no_wait_for_side_effects;
pub mod prefer_query_by_disappearance;

use std::collections::BTreeMap;

use tree_sitter::Node;
use waitcheck_core::parse::ast::ParsedFile;
use waitcheck_core::semantics::TestFileSemantics;
use waitcheck_core::semantics::handling::is_handled;
use waitcheck_core::semantics::node_utils::{callee_name_node, enclosing_call_for_callee, same_node};
use waitcheck_core::semantics::traversal::{NodeKind, NodeVisitor, walk};
use waitcheck_core::semantics::wrappers::WrapperRegistry;

use crate::rules::finding::RuleFinding;

/// A message id together with its template.
#[derive(Debug, Clone, Copy)]
pub struct Message {
    pub id: &'static str,
    pub template: &'static str,
}

/// `{ name: <name> }`
pub(crate) fn name_data(name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([("name".to_string(), name.to_string())])
}

pub(crate) fn finding_at_node(
    rule_id: &str,
    message: Message,
    data: BTreeMap<String, String>,
    sem: &TestFileSemantics,
    node: &Node,
) -> RuleFinding {
    RuleFinding::at_location(
        rule_id,
        message.id,
        message.template,
        data,
        &sem.path,
        &sem.parsed.location_for_node(node),
    )
}

/// The call for which `node` is the callee's own name.
pub(crate) fn call_named_by<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    let call = enclosing_call_for_callee(*node)?;
    let name = callee_name_node(&call)?;
    same_node(&name, node).then_some(call)
}

/// Which promise-returning utility a rule tracks.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PromiseSource<'a> {
    /// Async utilities, optionally restricted to these canonical names.
    AsyncUtil(Option<&'a [String]>),
    /// `findBy*` / `findAllBy*` queries.
    AsyncQuery,
}

impl PromiseSource<'_> {
    fn matches(&self, sem: &TestFileSemantics, name_node: &Node) -> bool {
        match self {
            PromiseSource::AsyncUtil(restrict) => sem.aliases.is_async_util(&sem.parsed, name_node, *restrict),
            PromiseSource::AsyncQuery => sem.aliases.is_async_query(&sem.parsed, name_node),
        }
    }
}

/// Reports unhandled promises from a utility, and from wrappers of it
/// registered earlier in the same file.
struct UnhandledPromiseVisitor<'a> {
    rule_id: &'a str,
    sem: &'a TestFileSemantics,
    source: PromiseSource<'a>,
    direct: Message,
    wrapper: Message,
    wrappers: WrapperRegistry,
    findings: Vec<RuleFinding>,
}

impl<'a> UnhandledPromiseVisitor<'a> {
    fn parsed(&self) -> &'a ParsedFile {
        &self.sem.parsed
    }

    fn report(&mut self, message: Message, node: &Node) {
        let name = self.parsed().text_of(node);
        let finding = finding_at_node(self.rule_id, message, name_data(name), self.sem, node);
        self.findings.push(finding);
    }
}

impl<'a, 't> NodeVisitor<'t> for UnhandledPromiseVisitor<'a> {
    fn enter(&mut self, node: Node<'t>, kind: NodeKind) {
        if !kind.is_name() || call_named_by(&node).is_none() {
            return;
        }
        let parsed = self.parsed();
        let name = parsed.text_of(&node);

        if self.source.matches(self.sem, &node) {
            self.wrappers.observe_utility_call(parsed, &node, name);
            if !is_handled(parsed, &self.sem.settings, &node) {
                self.report(self.direct, &node);
            }
        } else if self.wrappers.is_wrapper(name) {
            self.wrappers.observe_utility_call(parsed, &node, name);
            if !is_handled(parsed, &self.sem.settings, &node) {
                self.report(self.wrapper, &node);
            }
        }
    }
}

/// Run the unhandled-promise check over one file.
pub(crate) fn unhandled_promise_findings<'a>(
    rule_id: &'a str,
    sem: &'a TestFileSemantics,
    source: PromiseSource<'a>,
    direct: Message,
    wrapper: Message,
) -> Vec<RuleFinding> {
    let mut visitor = UnhandledPromiseVisitor {
        rule_id,
        sem,
        source,
        direct,
        wrapper,
        wrappers: WrapperRegistry::new(),
        findings: Vec::new(),
    };
    walk(&sem.parsed, &mut visitor);
    if !visitor.wrappers.is_empty() {
        tracing::debug!(
            rule = rule_id,
            file = %sem.path,
            wrappers = visitor.wrappers.len(),
            "wrappers detected"
        );
    }
    visitor.findings
}

/// Calls whose callee's own name resolves to an async utility in `names`.
pub(crate) fn async_util_calls<'t>(sem: &'t TestFileSemantics, names: &[String]) -> Vec<Node<'t>> {
    struct Collector<'a, 't> {
        sem: &'a TestFileSemantics,
        names: &'a [String],
        calls: Vec<Node<'t>>,
    }

    impl<'a, 't> NodeVisitor<'t> for Collector<'a, 't> {
        fn enter(&mut self, node: Node<'t>, kind: NodeKind) {
            if kind != NodeKind::CallExpression {
                return;
            }
            let Some(name) = callee_name_node(&node) else {
                return;
            };
            if self.sem.aliases.is_async_util(&self.sem.parsed, &name, Some(self.names)) {
                self.calls.push(node);
            }
        }
    }

    let mut collector = Collector {
        sem,
        names,
        calls: Vec::new(),
    };
    walk(&sem.parsed, &mut collector);
    collector.calls
}
