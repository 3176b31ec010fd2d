//! Classification of the statements inside callbacks passed to wait utilities.

use tree_sitter::Node;

use crate::parse::ast::ParsedFile;
use crate::semantics::aliases::{AliasTable, QueryVariant, UtilityCategory};
use crate::semantics::node_utils::{
    call_arguments, is_block, is_call_expression, is_callback_function, named_children_without_comments,
    statement_expression, unwrap_transparent,
};

/// Statements of a callback body, bucketed by what they do.
#[derive(Debug, Default)]
pub struct CallbackClassification<'t> {
    pub assertions: Vec<Node<'t>>,
    pub side_effects: Vec<Node<'t>>,
    /// Presence queries (`getBy*`/`findBy*`).
    pub queries: Vec<Node<'t>>,
}

/// First argument of a wait call, when it is a function literal.
pub fn waited_callback<'t>(call: &Node<'t>) -> Option<Node<'t>> {
    let first = call_arguments(call).into_iter().next().map(unwrap_transparent)?;
    is_callback_function(&first).then_some(first)
}

/// Non-comment statements of a block body, or the expression body alone.
pub fn callback_statements<'t>(callback: &Node<'t>) -> Vec<Node<'t>> {
    let Some(body) = callback.child_by_field_name("body") else {
        return Vec::new();
    };
    if is_block(&body) {
        named_children_without_comments(&body)
    } else {
        vec![body]
    }
}

/// Whether the callback has a block body.
pub fn has_block_body(callback: &Node) -> bool {
    callback.child_by_field_name("body").is_some_and(|b| is_block(&b))
}

pub fn classify<'t>(parsed: &ParsedFile, aliases: &AliasTable, statements: &[Node<'t>]) -> CallbackClassification<'t> {
    let mut out = CallbackClassification::default();

    for stmt in statements {
        match stmt.kind() {
            "expression_statement" => {
                let Some(expr) = statement_expression(stmt) else {
                    continue;
                };
                match aliases.resolve_call_leftmost(parsed, &expr).map(|id| id.category) {
                    Some(UtilityCategory::Assertion) => out.assertions.push(*stmt),
                    Some(UtilityCategory::FireEvent | UtilityCategory::UserEvent) if is_call_like(&expr) => {
                        out.side_effects.push(*stmt)
                    }
                    _ => {}
                }
                if is_presence_query(parsed, aliases, &expr) {
                    out.queries.push(*stmt);
                }
            }
            "return_statement" => {
                if let Some(expr) = statement_expression(stmt) {
                    if is_presence_query(parsed, aliases, &expr) {
                        out.queries.push(*stmt);
                    }
                }
            }
            "lexical_declaration" | "variable_declaration" => {
                let declarators = named_children_without_comments(stmt);
                let [declarator] = declarators.as_slice() else {
                    continue;
                };
                let Some(value) = declarator.child_by_field_name("value").map(strip_await) else {
                    continue;
                };
                if is_call_expression(&value)
                    && aliases
                        .resolve_call_leftmost(parsed, &value)
                        .is_some_and(|id| id.is_side_effect())
                {
                    out.side_effects.push(*stmt);
                }
            }
            // expression body of an arrow callback
            _ => {
                let expr = unwrap_transparent(*stmt);
                match aliases.resolve_call_leftmost(parsed, &expr).map(|id| id.category) {
                    Some(UtilityCategory::Assertion) => out.assertions.push(expr),
                    Some(UtilityCategory::FireEvent | UtilityCategory::UserEvent) if is_call_like(&expr) => {
                        out.side_effects.push(expr)
                    }
                    _ => {}
                }
                if is_presence_query(parsed, aliases, &expr) {
                    out.queries.push(expr);
                }
            }
        }
    }

    out
}

fn strip_await(node: Node) -> Node {
    let node = unwrap_transparent(node);
    if node.kind() == "await_expression" {
        statement_expression(&node).unwrap_or(node)
    } else {
        node
    }
}

fn is_call_like(node: &Node) -> bool {
    is_call_expression(&strip_await(*node))
}

/// Outermost call whose own callee is a `getBy*`/`findBy*` query.
pub fn is_presence_query(parsed: &ParsedFile, aliases: &AliasTable, expr: &Node) -> bool {
    let expr = strip_await(*expr);
    if !is_call_expression(&expr) {
        return false;
    }
    matches!(
        aliases.resolve_callee(parsed, &expr).map(|id| id.category),
        Some(UtilityCategory::Query(QueryVariant::Get | QueryVariant::Find))
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::parse::ast::FileId;
    use crate::parse::typescript::parse_typescript_file;
    use crate::semantics::settings::TestingLibrarySettings;
    use crate::types::context::{Language, SourceFile};

    fn setup(src: &str) -> (ParsedFile, AliasTable) {
        let sf = SourceFile {
            path: "callbacks.test.tsx".to_string(),
            language: Language::Typescript,
            content: src.to_string(),
        };
        let parsed = parse_typescript_file(FileId(1), &sf).unwrap();
        let aliases = AliasTable::from_parsed(&parsed, Arc::new(TestingLibrarySettings::default()));
        (parsed, aliases)
    }

    /// The callback passed to the last top-level call statement.
    fn last_callback(parsed: &ParsedFile) -> Node<'_> {
        let root = parsed.tree.root_node();
        let stmt = named_children_without_comments(&root).into_iter().last().unwrap();
        let call = statement_expression(&stmt).unwrap();
        waited_callback(&call).expect("callback argument")
    }

    #[test]
    fn test_block_callback_buckets_assertions_and_side_effects() {
        let (parsed, aliases) = setup(
            "import { waitFor, fireEvent } from '@testing-library/react';\n\
             waitFor(() => { fireEvent.click(btn); expect(a).toBe(1); expect(b).toBe(2); });",
        );
        let callback = last_callback(&parsed);
        assert!(has_block_body(&callback));
        let classes = classify(&parsed, &aliases, &callback_statements(&callback));
        assert_eq!(classes.assertions.len(), 2);
        assert_eq!(classes.side_effects.len(), 1);
        assert_eq!(parsed.text_of(&classes.side_effects[0]), "fireEvent.click(btn);");
    }

    #[test]
    fn test_renamed_side_effect_is_recognized() {
        let (parsed, aliases) = setup(
            "import { waitFor, fireEvent as fe } from '@testing-library/react';\nwaitFor(() => { fe.click(btn); });",
        );
        let callback = last_callback(&parsed);
        let classes = classify(&parsed, &aliases, &callback_statements(&callback));
        assert_eq!(classes.side_effects.len(), 1);
    }

    #[test]
    fn test_side_effect_from_other_module_is_ignored() {
        let (parsed, aliases) = setup(
            "import { waitFor } from '@testing-library/react';\nimport { fireEvent } from 'somewhere-else';\nwaitFor(() => { fireEvent.click(btn); });",
        );
        let callback = last_callback(&parsed);
        let classes = classify(&parsed, &aliases, &callback_statements(&callback));
        assert!(classes.side_effects.is_empty());
    }

    #[test]
    fn test_user_event_default_import_and_awaited_declaration() {
        let (parsed, aliases) = setup(
            "import { waitFor } from '@testing-library/react';\nimport ue from '@testing-library/user-event';\n\
             waitFor(async () => { const r = await ue.click(btn); await ue.type(input, 'x'); });",
        );
        let callback = last_callback(&parsed);
        let classes = classify(&parsed, &aliases, &callback_statements(&callback));
        assert_eq!(classes.side_effects.len(), 2);
    }

    #[test]
    fn test_expression_body_is_a_single_statement() {
        let (parsed, aliases) = setup(
            "import { waitFor } from '@testing-library/react';\nwaitFor(() => expect(a).toBe(1));",
        );
        let callback = last_callback(&parsed);
        assert!(!has_block_body(&callback));
        let statements = callback_statements(&callback);
        assert_eq!(statements.len(), 1);
        let classes = classify(&parsed, &aliases, &statements);
        assert_eq!(classes.assertions.len(), 1);
    }

    #[test]
    fn test_presence_queries_in_return_and_expression_positions() {
        let (parsed, aliases) = setup(
            "import { screen, waitForElementToBeRemoved } from '@testing-library/react';\n\
             waitForElementToBeRemoved(() => { screen.getByText('a'); return screen.findByRole('b'); });",
        );
        let callback = last_callback(&parsed);
        let classes = classify(&parsed, &aliases, &callback_statements(&callback));
        assert_eq!(classes.queries.len(), 2);
    }

    #[test]
    fn test_absence_queries_are_not_presence_queries() {
        let (parsed, aliases) = setup(
            "import { screen, waitForElementToBeRemoved } from '@testing-library/react';\n\
             waitForElementToBeRemoved(() => screen.queryByText('a'));",
        );
        let callback = last_callback(&parsed);
        let classes = classify(&parsed, &aliases, &callback_statements(&callback));
        assert!(classes.queries.is_empty());
    }

    #[test]
    fn test_non_function_argument_is_not_a_callback() {
        let (parsed, _) = setup("import { waitForElementToBeRemoved } from '@testing-library/react';\nwaitForElementToBeRemoved(el);");
        let root = parsed.tree.root_node();
        let stmt = named_children_without_comments(&root).into_iter().last().unwrap();
        let call = statement_expression(&stmt).unwrap();
        assert!(waited_callback(&call).is_none());
    }
}
