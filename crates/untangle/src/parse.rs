//! S1 — Parse: turn `{path: source}` into `{module_name: Module}` with raw
//! (not-yet-resolved) call strings.

use std::{collections::HashMap, path::Path};

use ruff_python_ast::{self as ast, Stmt, visitor::Visitor};
use ruff_text_size::Ranged;

use crate::{
    entities::{Entity, Method},
    error::PipelineError,
    imports,
    module::Module,
    qualified_name,
    visitors::{CallCollector, NameCollector},
};

/// 1-based source line a node starts on, computed from its byte offset.
/// Diagnostic-only: never consulted by resolution,
/// community detection, or rewriting.
fn line_of(source: &str, range: ruff_text_size::TextRange) -> u32 {
    let offset = usize::from(range.start()).min(source.len());
    1 + source.as_bytes()[..offset].iter().filter(|&&b| b == b'\n').count() as u32
}

/// Rewrite a `self.<rest>` call target collected from inside a method body
/// into `<module>.<class>.<rest>`. Any other call target is
/// returned unchanged.
fn rewrite_self_calls(calls: Vec<String>, module: &str, class: &str) -> Vec<String> {
    calls
        .into_iter()
        .map(|call| match call.strip_prefix("self.") {
            Some(rest) => format!("{module}.{class}.{rest}"),
            None => call,
        })
        .collect()
}

fn collect_calls(stmts: &[Stmt]) -> Vec<String> {
    let mut collector = CallCollector::new();
    for stmt in stmts {
        collector.visit_stmt(stmt);
    }
    collector.calls
}

/// Single-target simple-name assignment or annotated assignment targets,
/// e.g. `x = 1` or `x: int = 1`. Tuple/attribute/subscript targets and
/// multi-target assignments are not module-level bindings we track.
fn simple_assign_target(stmt: &Stmt) -> Option<String> {
    match stmt {
        Stmt::Assign(assign) if assign.targets.len() == 1 => match &assign.targets[0] {
            ast::Expr::Name(name) => Some(name.id.to_string()),
            _ => None,
        },
        Stmt::AnnAssign(ann) => match ann.target.as_ref() {
            ast::Expr::Name(name) => Some(name.id.to_string()),
            _ => None,
        },
        _ => None,
    }
}

fn extract_function(module_name: &str, func: &ast::StmtFunctionDef, source: &str) -> (String, Entity) {
    let qname = qualified_name::join(module_name, func.name.as_str());
    let calls = collect_calls(&func.body);
    let line = line_of(source, func.range());
    (
        qname.clone(),
        Entity::Function {
            name: qname,
            tree: func.clone(),
            calls,
            imports: Vec::new(),
            line,
        },
    )
}

fn extract_class(module_name: &str, class: &ast::StmtClassDef, source: &str) -> (String, Entity) {
    let class_qname = qualified_name::join(module_name, class.name.as_str());
    let line = line_of(source, class.range());

    let methods = class
        .body
        .iter()
        .filter_map(|stmt| match stmt {
            Stmt::FunctionDef(method) => {
                let method_qname = qualified_name::join(&class_qname, method.name.as_str());
                let raw_calls = collect_calls(&method.body);
                let calls = rewrite_self_calls(raw_calls, module_name, class.name.as_str());
                Some(Method {
                    name: method_qname,
                    tree: method.clone(),
                    calls,
                    line: line_of(source, method.range()),
                })
            }
            _ => None,
        })
        .collect();

    (
        class_qname.clone(),
        Entity::Class {
            name: class_qname,
            tree: class.clone(),
            methods,
            imports: Vec::new(),
            line,
        },
    )
}

/// Second pass: for every top-level function, record it
/// as a back edge of any module-level global whose leaf name appears
/// anywhere in that function's subtree. `__all__` is never a tracked
/// global (filtered out by the caller before this runs).
fn collect_global_back_edges(module_name: &str, body: &[Stmt], globals: &mut HashMap<String, Vec<String>>) {
    for stmt in body {
        if let Stmt::FunctionDef(func) = stmt {
            let func_qname = qualified_name::join(module_name, func.name.as_str());
            let mut names = NameCollector::new();
            for inner in &func.body {
                names.visit_stmt(inner);
            }
            for (global_name, back_edges) in globals.iter_mut() {
                let leaf = qualified_name::leaf_name(global_name);
                if names.names.contains(leaf) {
                    back_edges.push(func_qname.clone());
                }
            }
        }
    }
}

/// Parse one file into a [`Module`]. `path` is used only to derive the
/// module's qualified name relative to `root`; the text is read by the
/// caller.
pub fn parse_module(root: &Path, path: &Path, source: &str, source_suffix: &str) -> Result<Module, PipelineError> {
    let module_name = qualified_name::module_name_from_path(root, path, source_suffix);

    let parsed = ruff_python_parser::parse_module(source).map_err(|err| PipelineError::Parse {
        path: path.display().to_string(),
        detail: err.to_string(),
    })?;
    let tree = parsed.into_syntax();

    let mut imports = Vec::new();
    let mut entities = indexmap::IndexMap::new();
    let mut globals: HashMap<String, Vec<String>> = HashMap::new();

    for stmt in &tree.body {
        imports.extend(imports::records_from_stmt(stmt));

        match stmt {
            Stmt::FunctionDef(func) => {
                let (qname, entity) = extract_function(&module_name, func, source);
                entities.insert(qname, entity);
            }
            Stmt::ClassDef(class) => {
                let (qname, entity) = extract_class(&module_name, class, source);
                entities.insert(qname, entity);
            }
            _ => {
                if let Some(leaf) = simple_assign_target(stmt)
                    && leaf != "__all__"
                {
                    let qname = qualified_name::join(&module_name, &leaf);
                    globals.insert(qname, Vec::new());
                    // entity inserted below once back edges are known
                }
            }
        }
    }

    collect_global_back_edges(&module_name, &tree.body, &mut globals);

    for stmt in &tree.body {
        let Some(leaf) = simple_assign_target(stmt) else {
            continue;
        };
        if leaf == "__all__" {
            continue;
        }
        let qname = qualified_name::join(&module_name, &leaf);
        let back_edges = globals.remove(&qname).unwrap_or_default();
        entities.insert(
            qname.clone(),
            Entity::Global {
                name: qname,
                tree: stmt.clone(),
                back_edges,
                imports: Vec::new(),
                line: line_of(source, stmt.range()),
            },
        );
    }

    Ok(Module {
        name: module_name,
        tree,
        imports,
        entities,
    })
}
