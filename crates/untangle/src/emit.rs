//! S15/S16 — Turn module names into destination filepaths and backfill any
//! missing `__init__.py` package markers.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

/// `pkg.util.io` under destination root `dst` becomes `dst/pkg/util/io.py`
/// (or whatever `source_suffix`/`package_marker` the config carries).
fn to_filepath(dst_root: &Path, name: &str, source_suffix: &str) -> PathBuf {
    let mut path = dst_root.to_path_buf();
    for segment in name.split('.') {
        path.push(segment);
    }
    path.set_extension(source_suffix);
    path
}

pub fn create_new_filepaths(
    modules: IndexMap<String, String>,
    dst_root: &Path,
    source_suffix: &str,
) -> IndexMap<PathBuf, String> {
    modules.into_iter().map(|(name, source)| (to_filepath(dst_root, &name, source_suffix), source)).collect()
}

/// Every directory that owns at least one emitted file but has no package
/// marker of its own gets an empty one.
pub fn add_empty_inits_if_needed(
    mut files: IndexMap<PathBuf, String>,
    package_marker: &str,
    source_suffix: &str,
) -> IndexMap<PathBuf, String> {
    let marker_name = format!("{package_marker}.{source_suffix}");
    let existing: Vec<PathBuf> = files.keys().cloned().collect();

    let mut needed = Vec::new();
    for path in &existing {
        if let Some(dir) = path.parent() {
            let init_path = dir.join(&marker_name);
            if !files.contains_key(&init_path) && !needed.contains(&init_path) {
                needed.push(init_path);
            }
        }
    }

    for init_path in needed {
        files.insert(init_path, String::new());
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_filepath_from_dotted_name() {
        let mut modules = IndexMap::new();
        modules.insert("pkg.util.io".to_string(), "code".to_string());
        let files = create_new_filepaths(modules, Path::new("dst"), "py");
        assert!(files.contains_key(&PathBuf::from("dst/pkg/util/io.py")));
    }

    #[test]
    fn backfills_missing_package_markers() {
        let mut files = IndexMap::new();
        files.insert(PathBuf::from("dst/pkg/util/io.py"), "code".to_string());
        let files = add_empty_inits_if_needed(files, "__init__", "py");
        assert!(files.contains_key(&PathBuf::from("dst/pkg/util/__init__.py")));
        assert_eq!(files[&PathBuf::from("dst/pkg/util/__init__.py")], "");
    }

    #[test]
    fn existing_package_marker_is_not_overwritten() {
        let mut files = IndexMap::new();
        files.insert(PathBuf::from("dst/pkg/__init__.py"), "existing".to_string());
        let files = add_empty_inits_if_needed(files, "__init__", "py");
        assert_eq!(files[&PathBuf::from("dst/pkg/__init__.py")], "existing");
    }
}
