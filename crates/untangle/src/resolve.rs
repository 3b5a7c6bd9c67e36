//! S2 — Resolve calls: rewrite each module's raw call strings into
//! (partially) qualified form using that module's own import table and its
//! own top-level function/class names.
//!
//! Matches the lookup direction used by the canonical resolver this crate
//! is grounded on: the lookup key into `import_map` is the call string's
//! *last* dot-segment, not its first. That means a plain `alias()` call
//! resolves, but an attribute chain off an aliased module (`np.array()`)
//! generally does not — only `ent_map` (built from this module's own
//! function/class names, keyed by their last segment) resolves those.
//! Global back edges are already fully qualified by S1 and are left alone.

use std::collections::HashMap;

use crate::{entities::Entity, imports::ImportRecord, module::Module, qualified_name};

fn import_map(imports: &[ImportRecord]) -> HashMap<String, String> {
    imports
        .iter()
        .map(|i| {
            let value = if i.module != i.as_name {
                format!("{}.{}", i.module, i.as_name)
            } else {
                i.module.clone()
            };
            (i.as_name.clone(), value)
        })
        .collect()
}

fn entity_map(entities: &indexmap::IndexMap<String, Entity>) -> HashMap<String, String> {
    entities
        .values()
        .filter(|e| matches!(e, Entity::Function { .. } | Entity::Class { .. }))
        .map(|e| (qualified_name::leaf_name(e.name()).to_string(), e.name().to_string()))
        .collect()
}

fn last_segment(s: &str) -> &str {
    s.rsplit('.').next().unwrap_or(s)
}

fn first_segment(s: &str) -> &str {
    s.split('.').next().unwrap_or(s)
}

/// Resolve one module's worth of raw call strings against its own
/// `import_map`/`ent_map`.
fn resolve_call(call: &str, import_map: &HashMap<String, String>, ent_map: &HashMap<String, String>) -> String {
    if let Some(resolved) = import_map.get(last_segment(call)) {
        if last_segment(resolved) != call {
            let common_removed = resolved.rsplit_once('.').map_or("", |(head, _)| head);
            let joined = format!("{common_removed}.{call}");
            joined.trim_matches('.').to_string()
        } else {
            resolved.clone()
        }
    } else if let Some(resolved) = ent_map.get(first_segment(call)) {
        resolved.clone()
    } else {
        call.to_string()
    }
}

/// Resolve every call string recorded on every `Function`/`Class` entity
/// in `module`, in place. `Global` back edges are untouched.
pub fn resolve_module_calls(module: &mut Module) {
    let import_map = import_map(&module.imports);
    let ent_map = entity_map(&module.entities);

    for entity in module.entities.values_mut() {
        match entity {
            Entity::Function { calls, .. } => {
                for call in calls.iter_mut() {
                    *call = resolve_call(call, &import_map, &ent_map);
                }
            }
            Entity::Class { methods, .. } => {
                for method in methods.iter_mut() {
                    for call in method.calls.iter_mut() {
                        *call = resolve_call(call, &import_map, &ent_map);
                    }
                }
            }
            Entity::Global { .. } => {}
        }
    }
}
