//! Static check of whether a promise-returning call has its result handled.

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use crate::parse::ast::ParsedFile;
use crate::semantics::node_utils::{
    enclosing_call_for_callee, is_call_expression, is_function_like, is_member_expression,
    named_children_without_comments, outer_expression, same_node, unwrap_transparent,
};
use crate::semantics::settings::TestingLibrarySettings;

const PROMISE_COMBINATORS: &[&str] = &["all", "allSettled", "race", "any"];
const RESOLUTION_MATCHERS: &[&str] = &["resolves", "rejects"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlingEvidence {
    /// `await call()`
    Awaited,
    /// `call().then(..)`
    Chained,
    /// `return call()` or `() => call()`
    Returned,
    /// Element of a handled `Promise.all([...])`.
    Combined,
    /// `expect(call()).resolves...`
    AssertedResolution,
    /// `const p = call(); await p;`
    AssignedThenHandled,
    /// Assigned, and no read of the variable is handled.
    AssignedThenUnhandled,
    /// Bare statement or any other unhandled position.
    Discarded,
}

impl HandlingEvidence {
    pub fn is_handled(self) -> bool {
        !matches!(self, HandlingEvidence::AssignedThenUnhandled | HandlingEvidence::Discarded)
    }
}

/// Classify the call built around `node` (its callee name, or the call itself).
pub fn classify_handling(parsed: &ParsedFile, settings: &TestingLibrarySettings, node: &Node) -> HandlingEvidence {
    let expr = enclosing_call_for_callee(*node).unwrap_or(*node);
    classify_expression(parsed, settings, &expr)
}

pub fn is_handled(parsed: &ParsedFile, settings: &TestingLibrarySettings, node: &Node) -> bool {
    classify_handling(parsed, settings, node).is_handled()
}

/// Classify an expression whose value is a promise.
pub fn classify_expression(parsed: &ParsedFile, settings: &TestingLibrarySettings, expr: &Node) -> HandlingEvidence {
    if let Some(evidence) = direct_evidence(parsed, settings, expr) {
        return evidence;
    }

    let Some(declarator) = assigned_declarator(expr) else {
        return HandlingEvidence::Discarded;
    };

    // Any handled read is enough; unread assignments stay unhandled.
    let handled = variable_references(parsed, &declarator)
        .iter()
        .any(|read| direct_evidence(parsed, settings, read).is_some());
    if handled {
        HandlingEvidence::AssignedThenHandled
    } else {
        HandlingEvidence::AssignedThenUnhandled
    }
}

/// Evidence that does not involve following a variable.
fn direct_evidence(parsed: &ParsedFile, settings: &TestingLibrarySettings, expr: &Node) -> Option<HandlingEvidence> {
    let outer = outer_expression(*expr);
    let parent = outer.parent()?;

    match parent.kind() {
        "await_expression" => Some(HandlingEvidence::Awaited),
        "return_statement" => Some(HandlingEvidence::Returned),
        "arrow_function" => parent
            .child_by_field_name("body")
            .filter(|body| same_node(body, &outer))
            .map(|_| HandlingEvidence::Returned),
        "member_expression" => {
            let object = parent.child_by_field_name("object")?;
            let property = parent.child_by_field_name("property")?;
            (same_node(&object, &outer) && settings.is_continuation_method(parsed.text_of(&property)))
                .then_some(HandlingEvidence::Chained)
        }
        "array" => {
            let args = transparent_container(parent)?;
            combined_evidence(parsed, settings, &args)
        }
        "arguments" => combined_evidence(parsed, settings, &parent)
            .or_else(|| asserted_resolution(parsed, settings, &parent)),
        _ => None,
    }
}

/// The `arguments` node directly holding `array`.
fn transparent_container(array: Node) -> Option<Node> {
    let outer = outer_expression(array);
    outer.parent().filter(|p| p.kind() == "arguments")
}

/// `Promise.all(args)` where the combinator call is itself handled.
fn combined_evidence(parsed: &ParsedFile, settings: &TestingLibrarySettings, args: &Node) -> Option<HandlingEvidence> {
    let call = args.parent().filter(is_call_expression)?;
    let callee = unwrap_transparent(call.child_by_field_name("function")?);
    if !is_member_expression(&callee) {
        return None;
    }
    let object = unwrap_transparent(callee.child_by_field_name("object")?);
    let property = callee.child_by_field_name("property")?;
    if parsed.text_of(&object) != "Promise" || !PROMISE_COMBINATORS.contains(&parsed.text_of(&property)) {
        return None;
    }
    classify_expression(parsed, settings, &call)
        .is_handled()
        .then_some(HandlingEvidence::Combined)
}

/// `expect(promise).resolves` / `.rejects`.
fn asserted_resolution(parsed: &ParsedFile, settings: &TestingLibrarySettings, args: &Node) -> Option<HandlingEvidence> {
    let call = args.parent().filter(is_call_expression)?;
    let callee = unwrap_transparent(call.child_by_field_name("function")?);
    if callee.kind() != "identifier" || !settings.is_assertion_name(parsed.text_of(&callee)) {
        return None;
    }
    let member = outer_expression(call).parent().filter(is_member_expression)?;
    let property = member.child_by_field_name("property")?;
    RESOLUTION_MATCHERS
        .contains(&parsed.text_of(&property))
        .then_some(HandlingEvidence::AssertedResolution)
}

/// `const name = <expr>` with a plain identifier binding.
fn assigned_declarator<'t>(expr: &Node<'t>) -> Option<Node<'t>> {
    let outer = outer_expression(*expr);
    let parent = outer.parent().filter(|p| p.kind() == "variable_declarator")?;
    let value = parent.child_by_field_name("value")?;
    let name = parent.child_by_field_name("name")?;
    (same_node(&value, &outer) && name.kind() == "identifier").then_some(parent)
}

/// Read references to the variable declared by `declarator`, in document
/// order, lexically after the declaration and inside its declaring scope.
///
/// Nested scopes that redeclare the name are skipped, and so are
/// assignment targets.
pub fn variable_references<'t>(parsed: &ParsedFile, declarator: &Node<'t>) -> Vec<Node<'t>> {
    let Some(name_node) = declarator.child_by_field_name("name").filter(|n| n.kind() == "identifier") else {
        return Vec::new();
    };
    let name = parsed.text_of(&name_node);
    let Some(scope) = declaring_scope(*declarator) else {
        return Vec::new();
    };

    let mut reads = Vec::new();
    collect_reads(parsed, scope, &scope, name, declarator.end_byte(), &mut reads);
    reads
}

fn declaring_scope(declarator: Node) -> Option<Node> {
    let mut current = declarator.parent();
    while let Some(node) = current {
        if matches!(node.kind(), "statement_block" | "program" | "switch_body") {
            return Some(node);
        }
        current = node.parent();
    }
    None
}

fn collect_reads<'t>(
    parsed: &ParsedFile,
    node: Node<'t>,
    scope: &Node<'t>,
    name: &str,
    after: usize,
    out: &mut Vec<Node<'t>>,
) {
    if node.end_byte() <= after {
        return;
    }
    if !same_node(&node, scope) && redeclares(parsed, &node, name) {
        return;
    }
    if matches!(node.kind(), "identifier" | "shorthand_property_identifier")
        && node.start_byte() >= after
        && parsed.text_of(&node) == name
        && !is_write_target(&node)
    {
        out.push(node);
        return;
    }

    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
    for child in children {
        collect_reads(parsed, child, scope, name, after, out);
    }
}

fn is_write_target(node: &Node) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    let field = match parent.kind() {
        "assignment_expression" | "augmented_assignment_expression" => "left",
        "variable_declarator" => "name",
        _ => return false,
    };
    parent
        .child_by_field_name(field)
        .is_some_and(|target| same_node(&target, node))
}

/// Whether a nested scope introduces its own binding of `name`.
fn redeclares(parsed: &ParsedFile, node: &Node, name: &str) -> bool {
    if is_function_like(node) {
        if let Some(single) = node.child_by_field_name("parameter") {
            if parsed.text_of(&single) == name {
                return true;
            }
        }
        if let Some(params) = node.child_by_field_name("parameters") {
            if pattern_binds(parsed, &params, name) {
                return true;
            }
        }
        return false;
    }
    match node.kind() {
        "statement_block" => named_children_without_comments(node).iter().any(|stmt| match stmt.kind() {
            "lexical_declaration" | "variable_declaration" => named_children_without_comments(stmt)
                .iter()
                .filter(|d| d.kind() == "variable_declarator")
                .filter_map(|d| d.child_by_field_name("name"))
                .any(|pattern| pattern_binds(parsed, &pattern, name)),
            "function_declaration" | "class_declaration" => stmt
                .child_by_field_name("name")
                .is_some_and(|n| parsed.text_of(&n) == name),
            _ => false,
        }),
        "catch_clause" => node
            .child_by_field_name("parameter")
            .is_some_and(|p| pattern_binds(parsed, &p, name)),
        _ => false,
    }
}

/// Whether a binding pattern (or parameter list) binds `name`.
fn pattern_binds(parsed: &ParsedFile, pattern: &Node, name: &str) -> bool {
    match pattern.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => parsed.text_of(pattern) == name,
        // Only the binding side of these patterns introduces names.
        "pair_pattern" => pattern
            .child_by_field_name("value")
            .is_some_and(|v| pattern_binds(parsed, &v, name)),
        "assignment_pattern" | "object_assignment_pattern" => pattern
            .child_by_field_name("left")
            .is_some_and(|l| pattern_binds(parsed, &l, name)),
        "required_parameter" | "optional_parameter" => pattern
            .child_by_field_name("pattern")
            .is_some_and(|p| pattern_binds(parsed, &p, name)),
        _ => named_children_without_comments(pattern)
            .iter()
            .filter(|c| !matches!(c.kind(), "type_annotation" | "property_identifier"))
            .any(|c| pattern_binds(parsed, c, name)),
    }
}
