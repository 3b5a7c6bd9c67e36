//! Filesystem collaborator: list source files under a root,
//! read them into memory, and write the final tree back out. The core
//! pipeline never touches the filesystem directly — only this module does.

use std::{
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use walkdir::WalkDir;

use crate::error::{aggregate_io_errors, PipelineError};

/// Every file under `root` whose extension matches `source_suffix`,
/// sorted for deterministic processing order.
pub fn list_files(root: &Path, source_suffix: &str) -> Result<Vec<PathBuf>, PipelineError> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == source_suffix))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    Ok(files)
}

/// Read every listed file into memory, keyed by path. Collects every
/// per-file read failure before returning, rather than stopping at the
/// first one.
pub fn read_files(paths: &[PathBuf]) -> Result<IndexMap<PathBuf, String>, PipelineError> {
    let mut out = IndexMap::new();
    let mut failures = Vec::new();

    for path in paths {
        match fs::read_to_string(path) {
            Ok(source) => {
                out.insert(path.clone(), source);
            }
            Err(err) => failures.push((path.display().to_string(), err.to_string())),
        }
    }

    if failures.is_empty() {
        Ok(out)
    } else {
        Err(aggregate_io_errors(&failures))
    }
}

/// Write every file in `files`, creating parent directories as needed.
/// Collects every per-file write failure before returning.
pub fn write_files(files: &IndexMap<PathBuf, String>) -> Result<(), PipelineError> {
    let mut failures = Vec::new();

    for (path, contents) in files {
        let result = (|| -> std::io::Result<()> {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            fs::write(path, contents)
        })();
        if let Err(err) = result {
            failures.push((path.display().to_string(), err.to_string()));
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(aggregate_io_errors(&failures))
    }
}
