//! S1-S16 orchestration: an explicit early-return chain over the stage
//! closures, each wrapped in `PipelineError::Stage` on failure so a
//! reported error can be traced back to the stage number/name.

use std::path::PathBuf;

use log::{debug, info, trace};
use petgraph::{algo::is_cyclic_directed, graph::DiGraph};
use rustc_hash::FxHashMap;

use crate::{
    community::{self, CommunityStrategy},
    config::Config,
    emit,
    entities::Entity,
    error::PipelineError,
    extract, grouping, import_remap, io, naming, parse, rename, resolve, serialize,
};

/// Sanity-log whether the raw (pre-community) call graph is cyclic.
/// Diagnostic only: mutual recursion is ordinary in real packages and is
/// never rejected as a precondition.
fn log_cycle_sanity_check(call_tree: &indexmap::IndexMap<String, Vec<String>>) {
    let mut graph = DiGraph::<(), ()>::new();
    let mut nodes = FxHashMap::default();
    for name in call_tree.keys() {
        nodes.insert(name.as_str(), graph.add_node(()));
    }
    for (caller, callees) in call_tree {
        let Some(&src) = nodes.get(caller.as_str()) else { continue };
        for callee in callees {
            if let Some(&dst) = nodes.get(callee.as_str()) {
                graph.add_edge(src, dst, ());
            }
        }
    }
    debug!("raw call graph has cycles: {}", is_cyclic_directed(&graph));
}

/// Trace-level entity listing for `-vv`: one line per entity naming its
/// source line, never consulted by the pipeline itself.
fn trace_entity_listing(entities: &indexmap::IndexMap<String, Entity>) {
    for (name, entity) in entities {
        trace!("entity {name} at line {}", entity.line());
        if let Entity::Class { methods, .. } = entity {
            for method in methods {
                trace!("  method {} at line {}", method.name, method.line);
            }
        }
    }
}

/// Run the full pipeline: read `config.src_root`, rewrite, write
/// `config.dst_root`. Returns the set of files written, for callers that
/// want to inspect the result (tests) without re-reading the filesystem.
pub fn run(config: &Config) -> Result<indexmap::IndexMap<PathBuf, String>, PipelineError> {
    info!("listing source files under {:?}", config.src_root);
    let paths = io::list_files(&config.src_root, &config.source_suffix).map_err(|e| e.at_stage(0, "list_files"))?;
    let sources = io::read_files(&paths).map_err(|e| e.at_stage(0, "read_files"))?;

    // S1 — Parse
    let mut modules = Vec::with_capacity(sources.len());
    for (path, source) in &sources {
        let module = parse::parse_module(&config.src_root, path, source, &config.source_suffix)
            .map_err(|e| e.at_stage(1, "parse"))?;
        modules.push(module);
    }
    debug!("parsed {} modules", modules.len());

    // S2 — Resolve
    for module in modules.iter_mut() {
        resolve::resolve_module_calls(module);
    }

    // S3 — Extract
    let mut entities: indexmap::IndexMap<String, Entity> = extract::extract_entities(modules);
    info!("extracted {} entities", entities.len());
    trace_entity_listing(&entities);

    // S4 — Filter native calls / synthesize imports
    extract::filter_non_native_calls(&mut entities);

    // S5 — Call tree
    let call_tree = community::call_tree(&entities);
    log_cycle_sanity_check(&call_tree);

    // S6 — Adjacency matrix
    let mut adj_mat = community::AdjMat::from_call_tree(&call_tree);
    debug!("adjacency matrix has {} nodes", adj_mat.node_map.len());

    // S7-S9 — Community detection
    let strategy = community::AgglomerativeModularity;
    strategy.assign(&mut adj_mat);
    let community_count = adj_mat.communities.iter().collect::<std::collections::HashSet<_>>().len();
    info!("settled on {community_count} communities");

    // S10 — Group
    let groups = grouping::group_by_community(&adj_mat, entities);

    // S11 — Name
    let named = naming::infer_module_names(groups);

    // S12 — Rename overlaps
    let mut renamed = rename::rename_overlapping_mod_names(named);

    // S13 — Remap imports
    import_remap::remap_imports(&mut renamed);

    // S14 — Serialise
    let rendered = serialize::serialize_modules(&renamed);

    // S15/S16 — Filepaths + package markers
    let files = emit::create_new_filepaths(rendered, &config.dst_root, &config.source_suffix);
    let files = emit::add_empty_inits_if_needed(files, &config.package_marker, &config.source_suffix);

    io::write_files(&files).map_err(|e| e.at_stage(16, "write_files"))?;
    info!("wrote {} files under {:?}", files.len(), config.dst_root);

    if config.format_output {
        crate::formatter::format_tree(&config.dst_root);
    }

    Ok(files)
}
