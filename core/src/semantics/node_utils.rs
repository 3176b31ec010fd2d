//! Primitive predicates and extractors over tree-sitter nodes.
//!
//! Every function here is total: a shape that does not match yields `None`
//! or `false`, never a panic.

use tree_sitter::Node;

use crate::parse::ast::ParsedFile;

/// Wrappers that do not change the runtime value of their operand.
const TRANSPARENT_KINDS: &[&str] = &[
    "parenthesized_expression",
    "as_expression",
    "satisfies_expression",
    "non_null_expression",
    "type_assertion",
];

pub fn is_call_expression(node: &Node) -> bool {
    node.kind() == "call_expression"
}

pub fn is_member_expression(node: &Node) -> bool {
    node.kind() == "member_expression"
}

pub fn is_block(node: &Node) -> bool {
    node.kind() == "statement_block"
}

pub fn is_return_statement(node: &Node) -> bool {
    node.kind() == "return_statement"
}

pub fn is_await_expression(node: &Node) -> bool {
    node.kind() == "await_expression"
}

/// Function expressions that can be passed as callbacks.
pub fn is_callback_function(node: &Node) -> bool {
    matches!(
        node.kind(),
        "arrow_function" | "function_expression" | "function" | "generator_function"
    )
}

/// Anything that introduces a function body.
pub fn is_function_like(node: &Node) -> bool {
    is_callback_function(node)
        || matches!(
            node.kind(),
            "function_declaration" | "generator_function_declaration" | "method_definition"
        )
}

pub fn is_transparent(node: &Node) -> bool {
    TRANSPARENT_KINDS.contains(&node.kind())
}

pub fn same_node(a: &Node, b: &Node) -> bool {
    a.id() == b.id()
}

/// Named children, skipping comments.
pub fn named_children_without_comments<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

fn first_named_child<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    named_children_without_comments(node).into_iter().next()
}

/// Strip parentheses, `as`/`satisfies` casts and non-null assertions.
pub fn unwrap_transparent<'t>(node: Node<'t>) -> Node<'t> {
    let mut current = node;
    while is_transparent(&current) {
        let inner = if current.kind() == "type_assertion" {
            named_children_without_comments(&current).into_iter().last()
        } else {
            first_named_child(&current)
        };
        match inner {
            Some(inner) => current = inner,
            None => break,
        }
    }
    current
}

/// Climb through transparent wrappers and return the outermost one that
/// still evaluates to `node`'s value.
pub fn outer_expression<'t>(node: Node<'t>) -> Node<'t> {
    let mut current = node;
    while let Some(parent) = current.parent() {
        if is_transparent(&parent) {
            current = parent;
        } else {
            break;
        }
    }
    current
}

/// Meaningful parent of an expression, skipping transparent wrappers.
pub fn transparent_parent<'t>(node: Node<'t>) -> Option<Node<'t>> {
    outer_expression(node).parent()
}

/// Expression wrapped by an expression statement, `await` or `return`.
pub fn statement_expression<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    match node.kind() {
        "expression_statement" | "return_statement" | "await_expression" => {
            first_named_child(node).map(unwrap_transparent)
        }
        _ => None,
    }
}

/// Leftmost identifier of a call/member chain.
///
/// `expect(a).toBe(1)` yields `expect`, `fireEvent.click(btn)` yields
/// `fireEvent`, `await userEvent.type(el, 'x')` yields `userEvent`.
pub fn property_identifier_node<'t>(node: Node<'t>) -> Option<Node<'t>> {
    let node = unwrap_transparent(node);
    match node.kind() {
        "identifier" => Some(node),
        "member_expression" | "subscript_expression" => {
            property_identifier_node(node.child_by_field_name("object")?)
        }
        "call_expression" => property_identifier_node(node.child_by_field_name("function")?),
        "expression_statement" | "await_expression" => property_identifier_node(first_named_child(&node)?),
        _ => None,
    }
}

/// The callee's own name: `getByText` for both `getByText(..)` and
/// `screen.getByText(..)`.
pub fn callee_name_node<'t>(call: &Node<'t>) -> Option<Node<'t>> {
    if !is_call_expression(call) {
        return None;
    }
    let callee = unwrap_transparent(call.child_by_field_name("function")?);
    match callee.kind() {
        "identifier" => Some(callee),
        "member_expression" => callee
            .child_by_field_name("property")
            .filter(|p| p.kind() == "property_identifier"),
        _ => None,
    }
}

/// The call expression whose callee chain contains `node`.
///
/// Climbs only through member accesses and transparent wrappers, so an
/// identifier passed as an argument does not resolve to the surrounding
/// call.
pub fn enclosing_call_for_callee<'t>(node: Node<'t>) -> Option<Node<'t>> {
    if is_call_expression(&node) {
        return Some(node);
    }
    let mut current = node;
    loop {
        let parent = current.parent()?;
        match parent.kind() {
            "call_expression" => {
                let callee = parent.child_by_field_name("function")?;
                return same_node(&callee, &current).then_some(parent);
            }
            "member_expression" => current = parent,
            kind if TRANSPARENT_KINDS.contains(&kind) => current = parent,
            _ => return None,
        }
    }
}

/// Arguments of a call, without comments.
pub fn call_arguments<'t>(call: &Node<'t>) -> Vec<Node<'t>> {
    call.child_by_field_name("arguments")
        .map(|args| named_children_without_comments(&args))
        .unwrap_or_default()
}

/// Innermost function-like ancestor of `node`.
pub fn innermost_function<'t>(node: Node<'t>) -> Option<Node<'t>> {
    let mut current = node.parent();
    while let Some(candidate) = current {
        if is_function_like(&candidate) {
            return Some(candidate);
        }
        current = candidate.parent();
    }
    None
}

/// Expression a function effectively returns: the argument of the first
/// direct `return` of a block body, or the expression body of an arrow.
pub fn function_return_expression<'t>(function: &Node<'t>) -> Option<Node<'t>> {
    let body = function.child_by_field_name("body")?;
    if is_block(&body) {
        named_children_without_comments(&body)
            .into_iter()
            .find(is_return_statement)
            .and_then(|ret| first_named_child(&ret))
    } else {
        Some(body)
    }
}

/// Name a function is callable by in the rest of the file.
pub fn function_name(parsed: &ParsedFile, function: &Node) -> Option<String> {
    if let Some(name) = function.child_by_field_name("name") {
        return Some(parsed.text_for_node(&name));
    }
    if !is_callback_function(function) {
        return None;
    }
    let parent = transparent_parent(*function)?;
    match parent.kind() {
        "variable_declarator" => parent
            .child_by_field_name("name")
            .filter(|n| n.kind() == "identifier")
            .map(|n| parsed.text_for_node(&n)),
        "pair" => parent
            .child_by_field_name("key")
            .filter(|k| matches!(k.kind(), "property_identifier" | "identifier"))
            .map(|k| parsed.text_for_node(&k)),
        "assignment_expression" => {
            let left = parent.child_by_field_name("left")?;
            match left.kind() {
                "identifier" => Some(parsed.text_for_node(&left)),
                "member_expression" => left
                    .child_by_field_name("property")
                    .map(|p| parsed.text_for_node(&p)),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Value of a string literal (or a template string without substitutions).
pub fn string_literal_value(parsed: &ParsedFile, node: &Node) -> Option<String> {
    match node.kind() {
        "string" => strip_delimiters(parsed.text_of(node)),
        "template_string" => {
            let mut cursor = node.walk();
            let has_substitution = node
                .named_children(&mut cursor)
                .any(|c| c.kind() == "template_substitution");
            if has_substitution {
                None
            } else {
                strip_delimiters(parsed.text_of(node))
            }
        }
        _ => None,
    }
}

fn strip_delimiters(raw: &str) -> Option<String> {
    let mut chars = raw.chars();
    let first = chars.next()?;
    let last = chars.next_back()?;
    let inner = &raw[first.len_utf8()..raw.len() - last.len_utf8()];
    Some(inner.to_string())
}

/// Whether `node` is the `require('...')` call of a CommonJS import.
pub fn is_require_call(parsed: &ParsedFile, node: &Node) -> bool {
    is_call_expression(node)
        && node
            .child_by_field_name("function")
            .is_some_and(|f| f.kind() == "identifier" && parsed.text_of(&f) == "require")
}
