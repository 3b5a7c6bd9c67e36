//! S5-S9 — Build the call tree, the dense adjacency matrix, collapse
//! exclusive caller/callee pairs, optimise communities by directed weighted
//! modularity, and rescue leftover singleton communities.
//!
//! The matrix itself stays a dense `Vec<Vec<u32>>`; `petgraph` is used
//! narrowly elsewhere for raw-call-graph cycle checks, not for the matrix
//! itself.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::{entities::Entity, qualified_name};

/// S5 — `{caller: [callees]}`, built directly from each entity's surviving
/// call edges.
pub fn call_tree(entities: &IndexMap<String, Entity>) -> IndexMap<String, Vec<String>> {
    entities.iter().map(|(name, entity)| (name.clone(), entity.call_edges())).collect()
}

/// S6 — Dense adjacency matrix over a call tree. Node indices follow the
/// call tree's own iteration order (insertion order, stable across runs)
/// and are never recomputed or sorted, so indexing stays deterministic.
#[derive(Debug, Clone)]
pub struct AdjMat {
    pub mat: Vec<Vec<u32>>,
    pub node_map: IndexMap<usize, String>,
    pub communities: Vec<i64>,
}

impl AdjMat {
    pub fn from_call_tree(call_tree: &IndexMap<String, Vec<String>>) -> Self {
        let ent_idx: FxHashMap<&str, usize> =
            call_tree.keys().enumerate().map(|(i, name)| (name.as_str(), i)).collect();
        let n = ent_idx.len();
        let node_map: IndexMap<usize, String> =
            call_tree.keys().enumerate().map(|(i, name)| (i, name.clone())).collect();
        let mut mat = vec![vec![0u32; n]; n];

        for (caller, callees) in call_tree {
            let src = ent_idx[caller.as_str()];
            for callee in callees {
                if let Some(&dst) = ent_idx.get(callee.as_str()) {
                    mat[src][dst] += 1;
                }
            }
        }

        let communities = (0..n as i64).collect();
        Self { mat, node_map, communities }
    }

    fn n(&self) -> usize {
        self.mat.len()
    }
}

/// Directed weighted modularity, grounded exactly on the
/// original's `get_dwm`: degree vectors are column sums ("out") and row
/// sums ("in") respectively, kept as named in the source this is grounded
/// on even though that reads backwards from the conventional definition.
pub fn directed_weighted_modularity(mat: &[Vec<u32>], communities: &[i64]) -> f64 {
    let n = mat.len();
    if n == 0 {
        return 0.0;
    }

    let mut out_degree = vec![0f64; n]; // column sums
    let mut in_degree = vec![0f64; n]; // row sums
    for (i, row) in mat.iter().enumerate() {
        for (j, &w) in row.iter().enumerate() {
            out_degree[j] += w as f64;
            in_degree[i] += w as f64;
        }
    }
    let total_edges: f64 = out_degree.iter().sum();
    if total_edges == 0.0 {
        return 0.0;
    }

    let mut sum = 0.0;
    for i in 0..n {
        for j in 0..n {
            if communities[i] != communities[j] {
                continue;
            }
            let expected = out_degree[i] * in_degree[j] / total_edges;
            sum += mat[i][j] as f64 - expected;
        }
    }
    sum / total_edges
}

/// S7 — Collapse communities joined by an exclusive caller/callee pair: a
/// node with exactly one outgoing edge, to a node with exactly one incoming
/// edge, repeated until no more merges fire.
pub fn pair_exclusive_calls(adj_mat: &mut AdjMat) {
    let n = adj_mat.n();
    if n == 0 {
        return;
    }
    let adj_bin: Vec<Vec<bool>> = adj_mat.mat.iter().map(|row| row.iter().map(|&w| w > 0).collect()).collect();

    loop {
        let out_deg: Vec<usize> = adj_bin.iter().map(|row| row.iter().filter(|&&b| b).count()).collect();
        let mut in_deg = vec![0usize; n];
        for row in &adj_bin {
            for (j, &b) in row.iter().enumerate() {
                if b {
                    in_deg[j] += 1;
                }
            }
        }

        let mut changed = false;
        for a in 0..n {
            if out_deg[a] != 1 {
                continue;
            }
            for b in 0..n {
                if adj_bin[a][b] && in_deg[b] == 1 && adj_mat.communities[b] != adj_mat.communities[a] {
                    let from = adj_mat.communities[b];
                    let to = adj_mat.communities[a];
                    for c in adj_mat.communities.iter_mut() {
                        if *c == from {
                            *c = to;
                        }
                    }
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PossibleMerge {
    c1: i64,
    c2: i64,
    gain: f64,
}

fn unique_sorted_communities(communities: &[i64]) -> Vec<i64> {
    let mut unique: Vec<i64> = communities.to_vec();
    unique.sort_unstable();
    unique.dedup();
    unique
}

fn merge_communities(communities: &[i64], from: i64, to: i64) -> Vec<i64> {
    communities.iter().map(|&c| if c == from { to } else { c }).collect()
}

fn get_merge_pairs(mat: &[Vec<u32>], communities: &[i64]) -> Vec<PossibleMerge> {
    let unique = unique_sorted_communities(communities);
    let base_score = directed_weighted_modularity(mat, communities);

    let mut merges = Vec::new();
    for i in 0..unique.len() {
        for &c2 in &unique[i + 1..] {
            let c1 = unique[i];
            let merged = merge_communities(communities, c2, c1);
            let gain = directed_weighted_modularity(mat, &merged) - base_score;
            if gain > 0.0 {
                merges.push(PossibleMerge { c1, c2, gain });
            }
        }
    }
    merges
}

fn remove_overlapping_pairs(mut pairs: Vec<PossibleMerge>) -> Vec<PossibleMerge> {
    pairs.sort_by(|a, b| b.gain.partial_cmp(&a.gain).unwrap_or(std::cmp::Ordering::Equal));
    let mut selected = Vec::new();
    let mut seen = rustc_hash::FxHashSet::default();
    for pair in pairs {
        if !seen.contains(&pair.c1) && !seen.contains(&pair.c2) {
            seen.insert(pair.c1);
            seen.insert(pair.c2);
            selected.push(pair);
        }
    }
    selected
}

fn apply_merges(communities: &[i64], pairs: &[PossibleMerge]) -> Vec<i64> {
    let mut out = communities.to_vec();
    for pair in pairs {
        for c in out.iter_mut() {
            if *c == pair.c2 {
                *c = pair.c1;
            }
        }
    }
    out
}

/// S8 — Agglomeratively merge communities while directed weighted
/// modularity keeps improving.
pub fn optimise_communities(adj_mat: &mut AdjMat) {
    let mut valid_merges = get_merge_pairs(&adj_mat.mat, &adj_mat.communities);
    while !valid_merges.is_empty() {
        let to_merge = remove_overlapping_pairs(valid_merges);
        adj_mat.communities = apply_merges(&adj_mat.communities, &to_merge);
        valid_merges = get_merge_pairs(&adj_mat.mat, &adj_mat.communities);
    }
}

/// S9 — For every community left with exactly one member, try merging it
/// into whichever other singleton community in the same "directory" (its
/// qualified name minus its leaf) has the lowest node index, but only if
/// doing so doesn't hurt modularity.
pub fn merge_single_entity_communities_if_no_gain_penalty(adj_mat: &mut AdjMat) {
    let base_score = directed_weighted_modularity(&adj_mat.mat, &adj_mat.communities);

    let mut grouped: FxHashMap<i64, Vec<(usize, String)>> = FxHashMap::default();
    for (&idx, name) in &adj_mat.node_map {
        grouped.entry(adj_mat.communities[idx]).or_default().push((idx, name.clone()));
    }

    let mut min_for_dir: FxHashMap<String, usize> = FxHashMap::default();
    let mut updated: Vec<(i64, i64)> = Vec::new(); // (c2, c1)

    let mut singleton_comms: Vec<i64> = grouped
        .iter()
        .filter(|(_, items)| items.len() == 1)
        .map(|(&comm, _)| comm)
        .collect();
    singleton_comms.sort_unstable();

    for comm in singleton_comms {
        let (idx, name) = grouped[&comm][0].clone();
        let dirname = qualified_name::parent_name(&name);
        let entry = min_for_dir.entry(dirname).or_insert(idx);
        if idx < *entry {
            *entry = idx;
        }
        // The target is the raw node index of the lowest-index sibling in
        // the same directory, used directly as the new community label
        // (mirrors the original even when that index's own current label
        // has since drifted from its index).
        updated.push((comm, *entry as i64));
    }

    let mut merge_pairs = Vec::new();
    for (c2, c1) in updated {
        if c1 == c2 {
            continue;
        }
        let merged = merge_communities(&adj_mat.communities, c2, c1);
        let score = directed_weighted_modularity(&adj_mat.mat, &merged);
        let gain = score - base_score;
        if gain >= 0.0 {
            merge_pairs.push(PossibleMerge { c1, c2, gain });
        }
    }

    adj_mat.communities = apply_merges(&adj_mat.communities, &merge_pairs);
}

/// A community-assignment strategy, so the S7-S9 agglomerative pipeline can
/// be swapped out without touching callers. Only one
/// implementation exists today.
pub trait CommunityStrategy {
    fn assign(&self, adj_mat: &mut AdjMat);
}

/// The agglomerative directed-weighted-modularity optimiser: exclusive
/// pair collapse, then greedy merge-while-improving, then singleton rescue.
pub struct AgglomerativeModularity;

impl CommunityStrategy for AgglomerativeModularity {
    fn assign(&self, adj_mat: &mut AdjMat) {
        pair_exclusive_calls(adj_mat);
        optimise_communities(adj_mat);
        merge_single_entity_communities_if_no_gain_penalty(adj_mat);
    }
}
