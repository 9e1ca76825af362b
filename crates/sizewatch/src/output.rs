use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

pub fn write_json<T: Serialize>(value: &T, out: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("failed to serialize JSON output")?;
    writeln!(out).context("failed to write trailing newline")?;
    Ok(())
}

/// Tab-separated row with tabs and newlines in cells flattened to spaces.
pub fn write_row(out: &mut dyn Write, cells: &[&str]) -> std::io::Result<()> {
    let normalized: Vec<String> = cells.iter().map(|cell| normalize_field(cell)).collect();
    writeln!(out, "{}", normalized.join("\t"))
}

pub fn normalize_field(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}
