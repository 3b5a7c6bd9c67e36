//! A parsed file. Read-only from S3 onward: by the
//! time S3 runs, every entity has been moved out into the package-wide
//! entity map and the `Module` itself is dropped.

use indexmap::IndexMap;
use ruff_python_ast::ModModule;

use crate::{entities::Entity, imports::ImportRecord};

#[derive(Debug)]
pub struct Module {
    pub name: String,
    pub tree: ModModule,
    pub imports: Vec<ImportRecord>,
    /// Top-level entities, keyed by their fully qualified name, in
    /// source order.
    pub entities: IndexMap<String, Entity>,
}
