//! The tagged error sum produced by the pipeline.
//!
//! Every stage returns `anyhow::Result<T>`, exactly like the rest of the
//! crate, but the errors a stage can *originate* (as opposed to propagate
//! from a dependency) are one of the variants below. `Stage` wraps any of
//! them with the 1-based stage index so a failure can be traced back to
//! `S1`..`S16` without inspecting the call stack.

use std::fmt;

/// Errors the pipeline can originate.
#[derive(Debug)]
pub enum PipelineError {
    /// A source file failed to parse.
    Parse { path: String, detail: String },
    /// A read/write/list operation on the filesystem failed.
    Io { detail: String },
    /// An internal invariant was violated (never a user-facing ambiguity —
    /// those are simply left unresolved, see S2).
    Resolve { module: String, detail: String },
    /// Wraps any of the above with the stage that raised it.
    Stage {
        stage: usize,
        name: &'static str,
        cause: Box<PipelineError>,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { path, detail } => write!(f, "failed to parse '{path}': {detail}"),
            Self::Io { detail } => write!(f, "I/O failure: {detail}"),
            Self::Resolve { module, detail } => {
                write!(f, "internal resolution error in '{module}': {detail}")
            }
            Self::Stage { stage, name, cause } => {
                write!(f, "stage S{stage} ({name}) failed: {cause}")
            }
        }
    }
}

impl std::error::Error for PipelineError {}

impl PipelineError {
    /// Wrap `self` with the index and name of the stage that produced it.
    pub fn at_stage(self, stage: usize, name: &'static str) -> Self {
        Self::Stage {
            stage,
            name,
            cause: Box::new(self),
        }
    }
}

/// Aggregates the per-path failures of a partial-success filesystem read
/// into a single [`PipelineError::Io`].
pub fn aggregate_io_errors(failures: &[(String, String)]) -> PipelineError {
    let detail = failures
        .iter()
        .map(|(path, detail)| format!("{path}: {detail}"))
        .collect::<Vec<_>>()
        .join("; ");
    PipelineError::Io { detail }
}
