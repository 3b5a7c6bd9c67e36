//! Import records: the canonical in-memory form of a Python import
//! statement, and the textual form the serialiser emits.

use ruff_python_ast::{self as ast, Stmt};

/// Which of Python's two import statement shapes a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// `from <module> import <name>`
    From,
    /// `import <module>`
    Import,
}

/// A single imported name, already flattened out of its (possibly
/// multi-name) statement.
///
/// Relative imports are discarded at parse time (`level > 0` in
/// `ruff_python_ast::StmtImportFrom`) — the core never resolves them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportRecord {
    pub module: String,
    pub kind: ImportKind,
    pub name: String,
    pub as_name: String,
}

impl ImportRecord {
    pub fn new(module: impl Into<String>, kind: ImportKind, name: impl Into<String>, as_name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            kind,
            name: name.into(),
            as_name: as_name.into(),
        }
    }

    /// A `from <module> import <name>` record whose as-name equals its name.
    pub fn from_import(module: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(module, ImportKind::From, name.clone(), name)
    }

    /// Canonical textual form:
    /// `from <module> import <name> [as <alias>]` or `import <module> [as <alias>]`.
    pub fn to_import_string(&self) -> String {
        let mut out = match self.kind {
            ImportKind::From => format!("from {} import {}", self.module, self.name),
            ImportKind::Import => format!("import {}", self.module),
        };
        if self.name != self.as_name {
            out.push_str(&format!(" as {}", self.as_name));
        }
        out
    }
}

fn dotted_name(expr: &ast::Identifier) -> String {
    expr.as_str().to_string()
}

/// Extract absolute-import records from a top-level `import` statement.
/// One record per aliased name (`import a, b as c` yields two records).
pub fn records_from_import(stmt: &ast::StmtImport) -> Vec<ImportRecord> {
    stmt.names
        .iter()
        .map(|alias| {
            let module = alias.name.as_str().to_string();
            let as_name = alias
                .asname
                .as_ref()
                .map(|n| n.as_str().to_string())
                .unwrap_or_else(|| module.clone());
            ImportRecord::new(module.clone(), ImportKind::Import, module, as_name)
        })
        .collect()
}

/// Extract absolute-import records from a top-level `from ... import ...`
/// statement. Returns an empty vec for relative imports (`level > 0`) and
/// for `from __future__ import ...`, neither of which the core resolves.
pub fn records_from_import_from(stmt: &ast::StmtImportFrom) -> Vec<ImportRecord> {
    if stmt.level > 0 {
        return Vec::new();
    }
    let Some(module) = stmt.module.as_ref().map(dotted_name) else {
        return Vec::new();
    };
    if module == "__future__" {
        return Vec::new();
    }

    stmt.names
        .iter()
        .map(|alias| {
            let name = alias.name.as_str().to_string();
            let as_name = alias
                .asname
                .as_ref()
                .map(|n| n.as_str().to_string())
                .unwrap_or_else(|| name.clone());
            ImportRecord::new(module.clone(), ImportKind::From, name, as_name)
        })
        .collect()
}

/// Extract absolute-import records from any top-level statement; returns
/// an empty vec for anything that is not an import statement.
pub fn records_from_stmt(stmt: &Stmt) -> Vec<ImportRecord> {
    match stmt {
        Stmt::Import(s) => records_from_import(s),
        Stmt::ImportFrom(s) => records_from_import_from(s),
        _ => Vec::new(),
    }
}
