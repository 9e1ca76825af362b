use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use sizewatch_core::validate_history_index;

use crate::cli::ValidateArgs;
use crate::resolve_workspace_path;

/// Prints one line per problem and returns how many were found.
pub fn run_validate_command(
    workspace: &Path,
    args: ValidateArgs,
    out: &mut dyn Write,
) -> Result<usize> {
    let path = resolve_workspace_path(workspace, &args.path);
    let errors = validate_history_index(&path);

    if errors.is_empty() {
        writeln!(out, "{}: valid", path.display()).context("write validation result")?;
        return Ok(0);
    }

    for error in &errors {
        writeln!(out, "{}: {error}", path.display()).context("write validation error")?;
    }
    tracing::warn!(
        path = %path.display(),
        errors = errors.len(),
        "history index failed validation"
    );
    Ok(errors.len())
}
