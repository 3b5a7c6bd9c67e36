//! AST visitors used while extracting entities from a parsed module.
//! Each visitor answers one narrow question over a subtree;
//! `parse` composes them.

mod calls;
mod names;

pub use calls::CallCollector;
pub use names::NameCollector;
