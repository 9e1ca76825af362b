pub mod cli;
pub mod compare;
pub mod folders;
pub mod history;
pub mod logging;
pub mod output;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sizewatch_core::SizeReportSource;

/// Relative paths resolve against the workspace root.
pub fn resolve_workspace_path(workspace: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace.join(path)
    }
}

pub fn open_report_source(workspace: &Path, source: &Path) -> Result<SizeReportSource> {
    let path = resolve_workspace_path(workspace, source);
    SizeReportSource::open(&path)
        .with_context(|| format!("failed to open size report at {}", path.display()))
}
