//! Helpers for manipulating dotted qualified names.
//!
//! A qualified name is a non-empty `.`-separated path: `module.entity` or
//! `module.class.method`. The dot is the sole separator.

use std::path::{Component, Path};

/// Derive a module's qualified name from its path relative to the source
/// root: strip separators for dots, strip the trailing source-suffix, trim
/// leading/trailing dots. `src/pkg/util/io.py` under root `src` with suffix
/// `py` becomes `pkg.util.io`.
pub fn module_name_from_path(root: &Path, path: &Path, source_suffix: &str) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut segments = Vec::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            segments.push(part.to_string_lossy().into_owned());
        }
    }

    if let Some(last) = segments.last_mut() {
        let suffix = format!(".{source_suffix}");
        if let Some(stripped) = last.strip_suffix(&suffix) {
            *last = stripped.to_string();
        }
    }

    segments
        .join(".")
        .trim_matches('.')
        .to_string()
}

/// Everything except the last `.`-segment; `""` if there is no parent.
pub fn parent_name(qualified: &str) -> String {
    match qualified.rsplit_once('.') {
        Some((parent, _leaf)) => parent.to_string(),
        None => String::new(),
    }
}

/// The last `.`-segment.
pub fn leaf_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// Join a parent name and a leaf into a qualified name, handling an empty
/// parent.
pub fn join(parent: &str, leaf: &str) -> String {
    if parent.is_empty() {
        leaf.to_string()
    } else {
        format!("{parent}.{leaf}")
    }
}

/// Rewrite `name.a.b` to `name_with_last_two_joined_by_underscore`, e.g.
/// `pkg.util.io` with conflicting parent `pkg.util` becomes `pkg.util_io`.
pub fn join_last_two_with_underscore(qualified: &str) -> String {
    let parts: Vec<&str> = qualified.split('.').collect();
    if parts.len() < 2 {
        return qualified.to_string();
    }
    let mut out = parts[..parts.len() - 2].to_vec();
    let joined = format!("{}_{}", parts[parts.len() - 2], parts[parts.len() - 1]);
    out.push(&joined);
    out.join(".")
}
