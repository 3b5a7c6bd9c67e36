//! The three entity variants the community-detection layer operates on:
//! a tagged sum with a shared capability surface, dispatched on the
//! variant tag rather than through inheritance.

use std::collections::HashSet;

use ruff_python_ast::{Stmt, StmtClassDef, StmtFunctionDef};

use crate::imports::ImportRecord;

/// A method inside a [`Entity::Class`]: a function-like thing with its own
/// call list, but no separate qualified-name identity in the entity map
/// (the class is the entity; methods are carried along with it).
#[derive(Debug, Clone)]
pub struct Method {
    /// Fully qualified, e.g. `module.Class.method`.
    pub name: String,
    pub tree: StmtFunctionDef,
    pub calls: Vec<String>,
    pub line: u32,
}

/// A top-level definition extracted from a module: a function, a class
/// (with its methods), or a module-level binding.
#[derive(Debug, Clone)]
pub enum Entity {
    Function {
        name: String,
        tree: StmtFunctionDef,
        calls: Vec<String>,
        imports: Vec<ImportRecord>,
        line: u32,
    },
    Class {
        name: String,
        tree: StmtClassDef,
        methods: Vec<Method>,
        imports: Vec<ImportRecord>,
        line: u32,
    },
    /// A module-level binding. Its "calls" are the qualified names of
    /// top-level functions in the same module that reference it — back
    /// edges, not outbound calls.
    Global {
        name: String,
        tree: Stmt,
        back_edges: Vec<String>,
        imports: Vec<ImportRecord>,
        line: u32,
    },
}

/// Declared type priority used to order entities within a serialised
/// module: globals first, then classes, then functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TypePriority {
    Global = 0,
    Class = 1,
    Function = 2,
}

impl Entity {
    pub fn name(&self) -> &str {
        match self {
            Self::Function { name, .. } | Self::Class { name, .. } | Self::Global { name, .. } => name,
        }
    }

    pub fn imports(&self) -> &[ImportRecord] {
        match self {
            Self::Function { imports, .. } | Self::Class { imports, .. } | Self::Global { imports, .. } => imports,
        }
    }

    pub fn imports_mut(&mut self) -> &mut Vec<ImportRecord> {
        match self {
            Self::Function { imports, .. } | Self::Class { imports, .. } | Self::Global { imports, .. } => imports,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            Self::Function { line, .. } | Self::Class { line, .. } | Self::Global { line, .. } => *line,
        }
    }

    pub fn priority(&self) -> TypePriority {
        match self {
            Self::Global { .. } => TypePriority::Global,
            Self::Class { .. } => TypePriority::Class,
            Self::Function { .. } => TypePriority::Function,
        }
    }

    /// All outbound qualified-name references this entity depends on.
    pub fn call_edges(&self) -> Vec<String> {
        match self {
            Self::Function { calls, .. } => calls.clone(),
            Self::Class { methods, .. } => methods.iter().flat_map(|m| m.calls.clone()).collect(),
            Self::Global { back_edges, .. } => back_edges.clone(),
        }
    }

    /// Drop references not present in `set`; returns self for chaining.
    pub fn restrict_to(&mut self, set: &HashSet<String>) -> &mut Self {
        match self {
            Self::Function { calls, .. } => calls.retain(|c| set.contains(c)),
            Self::Class { methods, .. } => {
                for method in methods {
                    method.calls.retain(|c| set.contains(c));
                }
            }
            Self::Global { back_edges, .. } => back_edges.retain(|c| set.contains(c)),
        }
        self
    }

    /// For each remaining outbound reference, synthesise one `from
    /// <callee_module> import <callee_leaf>` import record.
    /// Globals have no outbound calls in this sense (their "calls" are
    /// back edges from callers, not things *they* call) and are a no-op,
    /// matching the original `GlobalCST.resolve_native_imports`.
    pub fn derive_native_imports(&mut self) -> &mut Self {
        match self {
            Self::Function { calls, imports, .. } => {
                for call in calls.iter() {
                    imports.push(synthesize_import(call));
                }
            }
            Self::Class { methods, imports, .. } => {
                for method in methods {
                    for call in method.calls.iter() {
                        imports.push(synthesize_import(call));
                    }
                }
            }
            Self::Global { .. } => {}
        }
        self
    }
}

fn synthesize_import(callee: &str) -> ImportRecord {
    let module = crate::qualified_name::parent_name(callee);
    let leaf = crate::qualified_name::leaf_name(callee);
    ImportRecord::from_import(module, leaf)
}

#[cfg(test)]
mod tests {
    use ruff_python_parser::parse_module;

    use super::*;

    fn function_entity(name: &str, calls: Vec<String>) -> Entity {
        let parsed = parse_module("def f():\n    pass\n").unwrap();
        let module = parsed.into_syntax();
        let Stmt::FunctionDef(tree) = module.body.into_iter().next().unwrap() else {
            unreachable!()
        };
        Entity::Function {
            name: name.to_string(),
            tree,
            calls,
            imports: Vec::new(),
            line: 1,
        }
    }

    #[test]
    fn restrict_to_drops_unknown_calls() {
        let mut entity = function_entity(
            "pkg.a",
            vec!["pkg.b".to_string(), "external.unrelated".to_string()],
        );
        let known: HashSet<String> = ["pkg.a".to_string(), "pkg.b".to_string()].into_iter().collect();
        entity.restrict_to(&known);
        assert_eq!(entity.call_edges(), vec!["pkg.b".to_string()]);
    }

    #[test]
    fn derive_native_imports_synthesizes_from_import() {
        let mut entity = function_entity("pkg.a", vec!["pkg.util.b".to_string()]);
        entity.derive_native_imports();
        assert_eq!(entity.imports()[0].to_import_string(), "from pkg.util import b");
    }

    #[test]
    fn global_derive_native_imports_is_noop() {
        let parsed = parse_module("x = 1\n").unwrap();
        let module = parsed.into_syntax();
        let stmt = module.body.into_iter().next().unwrap();
        let mut entity = Entity::Global {
            name: "pkg.x".to_string(),
            tree: stmt,
            back_edges: vec!["pkg.user_fn".to_string()],
            imports: Vec::new(),
            line: 1,
        };
        entity.derive_native_imports();
        assert!(entity.imports().is_empty());
    }
}
