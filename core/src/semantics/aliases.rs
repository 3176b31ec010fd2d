//! Import/require scanning and origin-aware resolution of local names.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use crate::parse::ast::{AstLocation, ParsedFile};
use crate::semantics::node_utils::{
    call_arguments, callee_name_node, is_member_expression, is_require_call,
    named_children_without_comments, property_identifier_node, same_node, string_literal_value,
    unwrap_transparent,
};
use crate::semantics::settings::TestingLibrarySettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryVariant {
    Get,
    Query,
    Find,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilityCategory {
    AsyncUtil,
    Query(QueryVariant),
    FireEvent,
    UserEvent,
    Assertion,
}

/// What a local name refers to once imports are taken into account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtilityIdentity {
    pub category: UtilityCategory,
    /// Exported name the local binding points at (`waitFor` for
    /// `import { waitFor as wf }`).
    pub canonical_name: String,
}

impl UtilityIdentity {
    pub fn is_side_effect(&self) -> bool {
        matches!(self.category, UtilityCategory::FireEvent | UtilityCategory::UserEvent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    /// `import { waitFor } from 'm'`
    Named,
    /// `import { waitFor as wf } from 'm'`
    NamedRenamed,
    /// `import userEvent from 'm'`
    Default,
    /// `import * as rtl from 'm'`
    Namespace,
    /// `const { waitFor } = require('m')`
    Require,
    /// `const { waitFor: wf } = require('m')`
    RequireRenamed,
    /// `const rtl = require('m')` or `import rtl = require('m')`
    RequireDefault,
}

impl BindingKind {
    /// Bindings that stand for the whole module object.
    fn is_module_object(self) -> bool {
        matches!(self, BindingKind::Default | BindingKind::Namespace | BindingKind::RequireDefault)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierBinding {
    pub local_name: String,
    /// Exported name; `None` for module-object bindings.
    pub imported_name: Option<String>,
    pub kind: BindingKind,
    pub module: String,
    pub location: AstLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportForm {
    /// `import ... from 'm'` or `import 'm'`
    Import,
    /// `require('m')`
    Require,
}

/// One module reference found at the top level of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleImport {
    pub specifier: String,
    /// Literal as written, quotes included.
    pub raw_literal: String,
    pub literal_start: usize,
    pub literal_end: usize,
    pub form: ImportForm,
    /// The import statement, or the `require` callee.
    pub anchor: AstLocation,
}

/// Per-file table from local names to their import bindings.
#[derive(Debug, Clone)]
pub struct AliasTable {
    settings: Arc<TestingLibrarySettings>,
    bindings: HashMap<String, IdentifierBinding>,
    imports: Vec<ModuleImport>,
    imports_testing_library: bool,
}

impl AliasTable {
    /// Scan the top-level imports and requires of `parsed`.
    pub fn from_parsed(parsed: &ParsedFile, settings: Arc<TestingLibrarySettings>) -> Self {
        let mut table = AliasTable {
            settings,
            bindings: HashMap::new(),
            imports: Vec::new(),
            imports_testing_library: false,
        };

        let root = parsed.tree.root_node();
        for stmt in named_children_without_comments(&root) {
            match stmt.kind() {
                "import_statement" => table.collect_import(parsed, &stmt),
                "lexical_declaration" | "variable_declaration" => {
                    for declarator in named_children_without_comments(&stmt) {
                        if declarator.kind() == "variable_declarator" {
                            table.collect_require(parsed, &declarator);
                        }
                    }
                }
                "expression_statement" => {
                    // bare `require('m')`
                    if let Some(expr) = stmt.named_child(0).map(unwrap_transparent) {
                        if is_require_call(parsed, &expr) {
                            table.record_require_module(parsed, &expr);
                        }
                    }
                }
                _ => {}
            }
        }

        table.imports_testing_library = table
            .imports
            .iter()
            .any(|m| table.settings.is_testing_library_module(&m.specifier));

        tracing::debug!(
            file = %parsed.path,
            bindings = table.bindings.len(),
            modules = table.imports.len(),
            testing_library = table.imports_testing_library,
            "built alias table"
        );

        table
    }

    pub fn settings(&self) -> &TestingLibrarySettings {
        &self.settings
    }

    pub fn binding(&self, local_name: &str) -> Option<&IdentifierBinding> {
        self.bindings.get(local_name)
    }

    pub fn bindings(&self) -> impl Iterator<Item = &IdentifierBinding> {
        self.bindings.values()
    }

    /// Whether the file imports testing-library or the configured utils module.
    pub fn imports_testing_library(&self) -> bool {
        self.imports_testing_library
    }

    /// All module references, in source order.
    pub fn imports(&self) -> &[ModuleImport] {
        &self.imports
    }

    /// Module references whose specifier is exactly one of `modules`.
    pub fn imports_from<'a>(&'a self, modules: &'a [String]) -> impl Iterator<Item = &'a ModuleImport> {
        self.imports
            .iter()
            .filter(move |m| modules.iter().any(|module| *module == m.specifier))
    }

    /// Resolve a bare local name to the utility it refers to.
    pub fn resolve_origin(&self, local_name: &str) -> Option<UtilityIdentity> {
        let settings = &*self.settings;

        let Some(binding) = self.bindings.get(local_name) else {
            if settings.is_assertion_name(local_name) {
                return identity(UtilityCategory::Assertion, local_name);
            }
            if !self.imports_testing_library {
                return None;
            }
            return categorize(settings, local_name).and_then(|c| identity(c, local_name));
        };

        if binding.kind.is_module_object() {
            // The user-event default export is the user-event object itself.
            if binding.kind != BindingKind::Namespace && settings.is_user_event_module(&binding.module) {
                return settings
                    .user_event_names
                    .first()
                    .and_then(|name| identity(UtilityCategory::UserEvent, name));
            }
            return None;
        }

        let imported = binding.imported_name.as_deref()?;
        if settings.is_testing_library_module(&binding.module) {
            categorize(settings, imported).and_then(|c| identity(c, imported))
        } else if settings.is_assertion_name(imported) {
            identity(UtilityCategory::Assertion, imported)
        } else {
            None
        }
    }

    /// Resolve `object.property` where `object` is a module-object binding
    /// of a testing-library module.
    pub fn resolve_member(&self, object_name: &str, property_name: &str) -> Option<UtilityIdentity> {
        let binding = self.bindings.get(object_name)?;
        if !binding.kind.is_module_object() || !self.settings.is_testing_library_module(&binding.module) {
            return None;
        }
        if binding.kind != BindingKind::Namespace && self.settings.is_user_event_module(&binding.module) {
            return None;
        }
        categorize(&self.settings, property_name).and_then(|c| identity(c, property_name))
    }

    /// Resolve an identifier occurrence, or the property of a member access.
    ///
    /// Query methods reached through any object (`screen.findByText`,
    /// `within(el).getByRole`) resolve by name when the file imports
    /// testing-library.
    pub fn resolve_node(&self, parsed: &ParsedFile, node: &Node) -> Option<UtilityIdentity> {
        match node.kind() {
            "identifier" => self.resolve_origin(parsed.text_of(node)),
            "property_identifier" => {
                let member = node.parent().filter(is_member_expression)?;
                let property = member.child_by_field_name("property")?;
                if !same_node(&property, node) {
                    return None;
                }
                let property_name = parsed.text_of(node);
                let object = unwrap_transparent(member.child_by_field_name("object")?);
                if object.kind() == "identifier" {
                    if let Some(found) = self.resolve_member(parsed.text_of(&object), property_name) {
                        return Some(found);
                    }
                }
                match categorize(&self.settings, property_name)? {
                    UtilityCategory::Query(variant) if self.imports_testing_library => {
                        identity(UtilityCategory::Query(variant), property_name)
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Resolve the callee's own name of a call.
    pub fn resolve_callee(&self, parsed: &ParsedFile, call: &Node) -> Option<UtilityIdentity> {
        callee_name_node(call).and_then(|name| self.resolve_node(parsed, &name))
    }

    /// Resolve the leftmost identifier of a call/member chain, falling back
    /// to the first property when the leftmost name is a module object
    /// (`rtl.fireEvent.click(..)`).
    pub fn resolve_call_leftmost(&self, parsed: &ParsedFile, expr: &Node) -> Option<UtilityIdentity> {
        let ident = property_identifier_node(*expr)?;
        let name = parsed.text_of(&ident);
        if let Some(found) = self.resolve_origin(name) {
            return Some(found);
        }
        let member = ident.parent().filter(is_member_expression)?;
        let property = member.child_by_field_name("property")?;
        self.resolve_member(name, parsed.text_of(&property))
    }

    /// Whether `node` names an async utility, optionally restricted to a
    /// subset of canonical names.
    pub fn is_async_util(&self, parsed: &ParsedFile, node: &Node, restrict: Option<&[String]>) -> bool {
        match self.resolve_node(parsed, node) {
            Some(UtilityIdentity {
                category: UtilityCategory::AsyncUtil,
                canonical_name,
            }) => restrict.is_none_or(|names| names.iter().any(|n| *n == canonical_name)),
            _ => false,
        }
    }

    /// Whether `node` names a `findBy*`/`findAllBy*` query.
    pub fn is_async_query(&self, parsed: &ParsedFile, node: &Node) -> bool {
        matches!(
            self.resolve_node(parsed, node),
            Some(UtilityIdentity {
                category: UtilityCategory::Query(QueryVariant::Find),
                ..
            })
        )
    }

    fn collect_import(&mut self, parsed: &ParsedFile, stmt: &Node) {
        let Some(source) = stmt.child_by_field_name("source") else {
            // `import x = require('m')`
            self.collect_import_require_clause(parsed, stmt);
            return;
        };
        let Some(module) = string_literal_value(parsed, &source) else {
            return;
        };
        self.imports.push(ModuleImport {
            specifier: module.clone(),
            raw_literal: parsed.text_for_node(&source),
            literal_start: source.start_byte(),
            literal_end: source.end_byte(),
            form: ImportForm::Import,
            anchor: parsed.location_for_node(stmt),
        });

        if is_type_only_import(parsed, stmt) {
            return;
        }

        let mut cursor = stmt.walk();
        let clauses: Vec<Node> = stmt
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "import_clause")
            .collect();
        for clause in clauses {
            for part in named_children_without_comments(&clause) {
                match part.kind() {
                    "identifier" => self.bind(parsed, &part, None, BindingKind::Default, &module),
                    "namespace_import" => {
                        if let Some(local) = named_children_without_comments(&part)
                            .into_iter()
                            .find(|n| n.kind() == "identifier")
                        {
                            self.bind(parsed, &local, None, BindingKind::Namespace, &module);
                        }
                    }
                    "named_imports" => {
                        for spec in named_children_without_comments(&part) {
                            if spec.kind() == "import_specifier" {
                                self.collect_import_specifier(parsed, &spec, &module);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn collect_import_specifier(&mut self, parsed: &ParsedFile, spec: &Node, module: &str) {
        if parsed.text_of(spec).starts_with("type ") {
            return;
        }
        let Some(name) = spec.child_by_field_name("name") else {
            return;
        };
        let imported = if name.kind() == "string" {
            string_literal_value(parsed, &name)
        } else {
            Some(parsed.text_for_node(&name))
        };
        match spec.child_by_field_name("alias") {
            Some(alias) => self.bind(parsed, &alias, imported, BindingKind::NamedRenamed, module),
            None => self.bind(parsed, &name, imported, BindingKind::Named, module),
        }
    }

    fn collect_import_require_clause(&mut self, parsed: &ParsedFile, stmt: &Node) {
        let Some(clause) = named_children_without_comments(stmt)
            .into_iter()
            .find(|c| c.kind() == "import_require_clause")
        else {
            return;
        };
        let Some(source) = clause.child_by_field_name("source") else {
            return;
        };
        let Some(module) = string_literal_value(parsed, &source) else {
            return;
        };
        self.imports.push(ModuleImport {
            specifier: module.clone(),
            raw_literal: parsed.text_for_node(&source),
            literal_start: source.start_byte(),
            literal_end: source.end_byte(),
            form: ImportForm::Import,
            anchor: parsed.location_for_node(stmt),
        });
        if let Some(local) = named_children_without_comments(&clause)
            .into_iter()
            .find(|n| n.kind() == "identifier")
        {
            self.bind(parsed, &local, None, BindingKind::RequireDefault, &module);
        }
    }

    fn collect_require(&mut self, parsed: &ParsedFile, declarator: &Node) {
        let Some(value) = declarator.child_by_field_name("value").map(unwrap_transparent) else {
            return;
        };
        if !is_require_call(parsed, &value) {
            return;
        }
        let Some(module) = self.record_require_module(parsed, &value) else {
            return;
        };
        let Some(pattern) = declarator.child_by_field_name("name") else {
            return;
        };

        match pattern.kind() {
            "identifier" => self.bind(parsed, &pattern, None, BindingKind::RequireDefault, &module),
            "object_pattern" => {
                for prop in named_children_without_comments(&pattern) {
                    match prop.kind() {
                        "shorthand_property_identifier_pattern" => {
                            let name = parsed.text_for_node(&prop);
                            self.bind(parsed, &prop, Some(name), BindingKind::Require, &module);
                        }
                        "object_assignment_pattern" => {
                            if let Some(left) = prop.child_by_field_name("left") {
                                let name = parsed.text_for_node(&left);
                                self.bind(parsed, &left, Some(name), BindingKind::Require, &module);
                            }
                        }
                        "pair_pattern" => {
                            let (Some(key), Some(value)) =
                                (prop.child_by_field_name("key"), prop.child_by_field_name("value"))
                            else {
                                continue;
                            };
                            let local = if value.kind() == "assignment_pattern" {
                                value.child_by_field_name("left")
                            } else {
                                Some(value)
                            };
                            if let Some(local) = local.filter(|l| l.kind() == "identifier") {
                                let imported = parsed.text_for_node(&key);
                                self.bind(parsed, &local, Some(imported), BindingKind::RequireRenamed, &module);
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    /// Record the module of a `require('m')` call and return its specifier.
    fn record_require_module(&mut self, parsed: &ParsedFile, call: &Node) -> Option<String> {
        let literal = call_arguments(call).into_iter().next()?;
        let module = string_literal_value(parsed, &literal)?;
        let callee = call.child_by_field_name("function")?;
        self.imports.push(ModuleImport {
            specifier: module.clone(),
            raw_literal: parsed.text_for_node(&literal),
            literal_start: literal.start_byte(),
            literal_end: literal.end_byte(),
            form: ImportForm::Require,
            anchor: parsed.location_for_node(&callee),
        });
        Some(module)
    }

    fn bind(
        &mut self,
        parsed: &ParsedFile,
        local: &Node,
        imported_name: Option<String>,
        kind: BindingKind,
        module: &str,
    ) {
        let local_name = parsed.text_for_node(local);
        self.bindings.insert(
            local_name.clone(),
            IdentifierBinding {
                local_name,
                imported_name,
                kind,
                module: module.to_string(),
                location: parsed.location_for_node(local),
            },
        );
    }
}

fn is_type_only_import(parsed: &ParsedFile, stmt: &Node) -> bool {
    let mut cursor = stmt.walk();
    let is_type = stmt
        .children(&mut cursor)
        .take_while(|c| c.kind() != "import_clause")
        .any(|c| c.kind() == "type" || (!c.is_named() && parsed.text_of(&c) == "type"));
    is_type
}

fn identity(category: UtilityCategory, name: &str) -> Option<UtilityIdentity> {
    Some(UtilityIdentity {
        category,
        canonical_name: name.to_string(),
    })
}

/// Category of an exported testing-library name.
pub fn categorize(settings: &TestingLibrarySettings, name: &str) -> Option<UtilityCategory> {
    if settings.is_async_util_name(name) {
        Some(UtilityCategory::AsyncUtil)
    } else if settings.is_get_query_name(name) {
        Some(UtilityCategory::Query(QueryVariant::Get))
    } else if settings.is_query_query_name(name) {
        Some(UtilityCategory::Query(QueryVariant::Query))
    } else if settings.is_find_query_name(name) {
        Some(UtilityCategory::Query(QueryVariant::Find))
    } else if settings.is_fire_event_name(name) {
        Some(UtilityCategory::FireEvent)
    } else if settings.is_user_event_name(name) {
        Some(UtilityCategory::UserEvent)
    } else if settings.is_assertion_name(name) {
        Some(UtilityCategory::Assertion)
    } else {
        None
    }
}
