//! Detection of user functions that return a utility call.
//!
//! The registry grows during a single document-order pass: a wrapper is only
//! known to occurrences visited after its qualifying return.

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use crate::parse::ast::{AstLocation, ParsedFile};
use crate::semantics::node_utils::{
    enclosing_call_for_callee, function_name, function_return_expression, innermost_function,
    is_await_expression, named_children_without_comments, same_node, unwrap_transparent,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapperBinding {
    pub name: String,
    /// The wrapping function.
    pub location: AstLocation,
    /// Utility or wrapper name whose call the function returns.
    pub via: String,
}

/// Append-only, insertion-ordered wrapper names of one file.
#[derive(Debug, Clone, Default)]
pub struct WrapperRegistry {
    bindings: Vec<WrapperBinding>,
}

impl WrapperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the function enclosing `node` when it returns exactly the
    /// call built around `node`. Returns the registered name.
    ///
    /// `via` names what is being wrapped, for diagnostics.
    pub fn observe_utility_call(&mut self, parsed: &ParsedFile, node: &Node, via: &str) -> Option<&str> {
        let call = enclosing_call_for_callee(*node)?;
        let function = innermost_function(call)?;
        let returned = strip_await(function_return_expression(&function)?);
        if !same_node(&returned, &call) {
            return None;
        }
        let name = function_name(parsed, &function)?;

        if let Some(index) = self.bindings.iter().position(|b| b.name == name) {
            return Some(self.bindings[index].name.as_str());
        }

        tracing::trace!(file = %parsed.path, wrapper = %name, via = %via, "registered wrapper");
        self.bindings.push(WrapperBinding {
            name,
            location: parsed.location_for_node(&function),
            via: via.to_string(),
        });
        self.bindings.last().map(|b| b.name.as_str())
    }

    pub fn is_wrapper(&self, name: &str) -> bool {
        self.bindings.iter().any(|b| b.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&WrapperBinding> {
        self.bindings.iter().find(|b| b.name == name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

fn strip_await(node: Node) -> Node {
    let mut current = unwrap_transparent(node);
    while is_await_expression(&current) {
        match named_children_without_comments(&current).into_iter().next() {
            Some(inner) => current = unwrap_transparent(inner),
            None => break,
        }
    }
    current
}
