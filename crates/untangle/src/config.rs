//! Ambient run configuration for the pipeline: a plain data struct with no
//! validation logic of its own, constructed either from CLI flags or
//! directly by tests.

use std::path::PathBuf;

/// Configuration for a single `untangle` run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the package to read.
    pub src_root: PathBuf,
    /// Root the rewritten package is written under.
    pub dst_root: PathBuf,
    /// File extension (without the dot) the input language uses.
    pub source_suffix: String,
    /// Stem of the package-root marker file (e.g. `__init__`).
    pub package_marker: String,
    /// Whether to invoke the external formatter after writing.
    pub format_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            src_root: PathBuf::new(),
            dst_root: PathBuf::new(),
            source_suffix: "py".to_string(),
            package_marker: "__init__".to_string(),
            format_output: true,
        }
    }
}
