//! Collects call targets out of an entity's subtree, resolving `Name` and
//! `Attribute` call expressions into dotted strings.

use ruff_python_ast::{
    Expr,
    visitor::{Visitor, walk_expr},
};

/// Walks an AST fragment collecting every call expression's target as a
/// raw (not-yet-resolved) dotted string.
#[derive(Debug, Default)]
pub struct CallCollector {
    pub calls: Vec<String>,
}

impl CallCollector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'a> Visitor<'a> for CallCollector {
    fn visit_expr(&mut self, expr: &'a Expr) {
        if let Expr::Call(call) = expr
            && let Some(target) = resolve_call_target(&call.func)
        {
            self.calls.push(target);
        }
        walk_expr(self, expr);
    }
}

/// Flatten `Name`/`Attribute` chains by concatenating left-spine names
/// with `.`. A chain whose root is not a simple name (e.g. `foo().bar`,
/// a subscript, a literal) contributes only the final `.attr` suffix;
/// anything else (the target isn't an attribute access or a bare name at
/// all) resolves to `None` and the call site is simply not recorded.
fn resolve_call_target(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Name(name) => Some(name.id.to_string()),
        Expr::Attribute(attr) => {
            let suffix = attr.attr.as_str();
            match resolve_call_target(&attr.value) {
                Some(parent) => Some(format!("{parent}.{suffix}")),
                None => Some(suffix.to_string()),
            }
        }
        _ => None,
    }
}
