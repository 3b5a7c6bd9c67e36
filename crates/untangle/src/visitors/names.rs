//! Collects every bare `Name` reference inside an AST fragment. Used by
//! global back-edge discovery: a function "references"
//! a module-level binding if the binding's leaf name shows up anywhere in
//! the function's subtree.

use rustc_hash::FxHashSet;
use ruff_python_ast::{
    Expr,
    visitor::{Visitor, walk_expr},
};

#[derive(Debug, Default)]
pub struct NameCollector {
    pub names: FxHashSet<String>,
}

impl NameCollector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'a> Visitor<'a> for NameCollector {
    fn visit_expr(&mut self, expr: &'a Expr) {
        if let Expr::Name(name) = expr {
            self.names.insert(name.id.to_string());
        }
        walk_expr(self, expr);
    }
}
