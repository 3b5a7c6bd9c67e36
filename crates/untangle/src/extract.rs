//! S3/S4 — Extract + filter: flatten every parsed module's entities into a
//! single package-wide map, stamp each entity with its module's import
//! table, then drop outbound references that don't land on another known
//! entity and synthesize native imports for the ones that do.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::{entities::Entity, module::Module};

/// Flatten every module's entities into one `{qualified_name: Entity}` map,
/// copying each module's import table onto every entity it owns (mirrors
/// the original `extract_entities` stamping `fn.imports = mod.imports`).
pub fn extract_entities(modules: Vec<Module>) -> IndexMap<String, Entity> {
    let mut entities = IndexMap::new();
    for module in modules {
        for (name, mut entity) in module.entities {
            *entity.imports_mut() = module.imports.clone();
            entities.insert(name, entity);
        }
    }
    entities
}

/// Drop every outbound reference that isn't itself a key in `entities`,
/// then synthesize a native `from <module> import <leaf>` record for each
/// surviving one. Entities with no surviving calls still get
/// visited; they simply synthesize nothing.
pub fn filter_non_native_calls(entities: &mut IndexMap<String, Entity>) {
    let known: HashSet<String> = entities.keys().cloned().collect();
    for entity in entities.values_mut() {
        entity.restrict_to(&known).derive_native_imports();
    }
}
