//! Optional post-pass that hands the rewritten tree to an external `ruff
//! format` invocation, gated on `Config::format_output`. The core never
//! depends on the formatter being installed: a missing binary is logged
//! and otherwise ignored, since the tree it already wrote is valid Python
//! either way.

use std::{path::Path, process::Command};

use log::warn;

pub fn format_tree(dst_root: &Path) {
    let result = Command::new("ruff").arg("format").arg(dst_root).status();

    match result {
        Ok(status) if status.success() => {}
        Ok(status) => warn!("ruff format exited with {status}"),
        Err(err) => warn!("could not invoke ruff format: {err}"),
    }
}
