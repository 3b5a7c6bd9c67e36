//! S11 — Infer a module name for each community. A community
//! with one member keeps that member's own qualified name as its module;
//! a community with several members takes the parent name shared by the
//! most of them, falling back to `.mod_overflow` when every candidate name
//! is already taken.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::{entities::Entity, qualified_name};

/// Tie-break for candidates sharing the same member count. The original
/// built this ranking from a `set`, whose iteration order is not
/// reproducible across runs (Python's string hash is randomised per
/// process) — ties here are broken by ascending name instead, so the same
/// input always produces the same module layout.
fn ranked_candidate_names(names: &[String]) -> Vec<(String, usize)> {
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for name in names {
        *counts.entry(name.as_str()).or_insert(0) += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().map(|(n, c)| (n.to_string(), c)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

pub fn infer_module_names(groups: IndexMap<i64, Vec<Entity>>) -> IndexMap<String, Vec<Entity>> {
    let mut renamed: IndexMap<String, Vec<Entity>> = IndexMap::new();

    for contents in groups.into_values() {
        let mod_name = if contents.len() > 1 {
            let names: Vec<String> = contents.iter().map(|e| qualified_name::parent_name(e.name())).collect();
            let candidates = ranked_candidate_names(&names);
            candidates
                .iter()
                .find(|(name, _)| !renamed.contains_key(name))
                .map(|(name, _)| name.clone())
                .unwrap_or_else(|| format!("{}.mod_overflow", candidates[0].0))
        } else {
            contents[0].name().to_string()
        };
        renamed.insert(mod_name, contents);
    }

    renamed
}
