//! Single depth-first, document-order pass over a parsed file.

use tree_sitter::Node;

use crate::parse::ast::ParsedFile;

/// Node categories the rules dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    ImportStatement,
    VariableDeclarator,
    CallExpression,
    MemberExpression,
    AwaitExpression,
    Identifier,
    PropertyIdentifier,
    ArrowFunction,
    FunctionExpression,
    FunctionDeclaration,
    MethodDefinition,
    StatementBlock,
    ExpressionStatement,
    ReturnStatement,
    Other,
}

impl NodeKind {
    pub fn of(node: &Node) -> Self {
        match node.kind() {
            "program" => NodeKind::Program,
            "import_statement" => NodeKind::ImportStatement,
            "variable_declarator" => NodeKind::VariableDeclarator,
            "call_expression" => NodeKind::CallExpression,
            "member_expression" => NodeKind::MemberExpression,
            "await_expression" => NodeKind::AwaitExpression,
            "identifier" => NodeKind::Identifier,
            "property_identifier" => NodeKind::PropertyIdentifier,
            "arrow_function" => NodeKind::ArrowFunction,
            "function_expression" | "function" | "generator_function" => NodeKind::FunctionExpression,
            "function_declaration" | "generator_function_declaration" => NodeKind::FunctionDeclaration,
            "method_definition" => NodeKind::MethodDefinition,
            "statement_block" => NodeKind::StatementBlock,
            "expression_statement" => NodeKind::ExpressionStatement,
            "return_statement" => NodeKind::ReturnStatement,
            _ => NodeKind::Other,
        }
    }

    /// Identifier-like nodes that can name a callee.
    pub fn is_name(self) -> bool {
        matches!(self, NodeKind::Identifier | NodeKind::PropertyIdentifier)
    }
}

/// Callbacks for [`walk`]. Both default to doing nothing, so visitors only
/// implement the side they need.
pub trait NodeVisitor<'t> {
    fn enter(&mut self, _node: Node<'t>, _kind: NodeKind) {}

    fn leave(&mut self, _node: Node<'t>, _kind: NodeKind) {}
}

/// Visit every named node of `parsed` in document order.
pub fn walk<'t, V: NodeVisitor<'t>>(parsed: &'t ParsedFile, visitor: &mut V) {
    walk_node(parsed.tree.root_node(), visitor);
}

fn walk_node<'t, V: NodeVisitor<'t>>(node: Node<'t>, visitor: &mut V) {
    let kind = NodeKind::of(&node);
    visitor.enter(node, kind);

    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
    for child in children {
        walk_node(child, visitor);
    }

    visitor.leave(node, kind);
}
