//! S14 — Render each regrouped module back to Python source:
//! entities sorted by type priority then name, a deduplicated/sorted import
//! block ahead of them, rendered through `ruff_python_codegen`.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use ruff_python_codegen::{Generator, Stylist};

use crate::entities::Entity;

fn stmt_source(stylist: &Stylist, stmt: &ruff_python_ast::Stmt) -> String {
    Generator::from(stylist).stmt(stmt)
}

fn entity_stmts(entity: &Entity) -> Vec<ruff_python_ast::Stmt> {
    match entity {
        Entity::Function { tree, .. } => vec![ruff_python_ast::Stmt::FunctionDef(tree.clone())],
        Entity::Class { tree, .. } => vec![ruff_python_ast::Stmt::ClassDef(tree.clone())],
        Entity::Global { tree, .. } => vec![tree.clone()],
    }
}

fn render_module(contents: &[Entity]) -> String {
    let mut sorted: Vec<&Entity> = contents.iter().collect();
    sorted.sort_by(|a, b| a.priority().cmp(&b.priority()).then_with(|| a.name().cmp(b.name())));

    let mut imports: BTreeSet<String> = BTreeSet::new();
    for entity in &sorted {
        for imp in entity.imports() {
            imports.insert(imp.to_import_string());
        }
    }

    let empty_parsed = ruff_python_parser::parse_module("").expect("empty module always parses");
    let stylist = Stylist::from_tokens(empty_parsed.tokens(), "");

    let mut out = String::new();
    for imp in &imports {
        out.push_str(imp);
        out.push('\n');
    }
    for entity in &sorted {
        for stmt in entity_stmts(entity) {
            out.push_str(&stmt_source(&stylist, &stmt));
            out.push('\n');
        }
    }
    out
}

/// Render every regrouped module to its final source text.
pub fn serialize_modules(modules: &IndexMap<String, Vec<Entity>>) -> IndexMap<String, String> {
    modules.iter().map(|(name, contents)| (name.clone(), render_module(contents))).collect()
}
