//! S10 — Group entities by their final community label.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::{community::AdjMat, entities::Entity};

/// `{community_label: [entity]}`, entities consumed out of the package-wide
/// map in community-assignment order.
pub fn group_by_community(adj_mat: &AdjMat, mut entities: IndexMap<String, Entity>) -> IndexMap<i64, Vec<Entity>> {
    let mut groups: IndexMap<i64, Vec<Entity>> = IndexMap::new();
    let mut order: FxHashMap<i64, ()> = FxHashMap::default();

    for (&idx, name) in &adj_mat.node_map {
        let label = adj_mat.communities[idx];
        let Some(entity) = entities.shift_remove(name) else {
            continue;
        };
        if order.insert(label, ()).is_none() {
            groups.insert(label, Vec::new());
        }
        groups.get_mut(&label).expect("just inserted").push(entity);
    }

    groups
}
