//! S13 — Remap each entity's native imports to point at the new module
//! layout: an import of something that's moved into the
//! current module is dropped outright; an import of something that's
//! moved elsewhere is rewritten to the new module; anything else (library
//! imports) is left untouched.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::{entities::Entity, imports::ImportRecord};

pub fn remap_imports(modules: &mut IndexMap<String, Vec<Entity>>) {
    let mut entity_module: FxHashMap<String, String> = FxHashMap::default();
    for (mod_name, contents) in modules.iter() {
        for entity in contents {
            entity_module.insert(entity.name().to_string(), mod_name.clone());
        }
    }

    for (mod_name, contents) in modules.iter_mut() {
        for entity in contents.iter_mut() {
            let updated: Vec<ImportRecord> = entity
                .imports()
                .iter()
                .filter_map(|imp| {
                    let target = format!("{}.{}", imp.module, imp.name);
                    match entity_module.get(&target) {
                        None => Some(imp.clone()),
                        Some(new_mod) if new_mod != mod_name => Some(ImportRecord::new(
                            new_mod.clone(),
                            imp.kind,
                            imp.name.clone(),
                            imp.as_name.clone(),
                        )),
                        Some(_) => None,
                    }
                })
                .collect();
            *entity.imports_mut() = updated;
        }
    }
}
