use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::{FoldersArgs, OutputFormat};
use crate::open_report_source;
use crate::output::{write_json, write_row};

#[derive(Debug, Serialize)]
struct FolderListing {
    manifest: String,
    generated_at: Option<String>,
    folders: Vec<FolderRow>,
}

#[derive(Debug, Serialize)]
struct FolderRow {
    folder: String,
    index: String,
    index_exists: bool,
}

pub fn run_folders_command(
    workspace: &Path,
    args: FoldersArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let source = open_report_source(workspace, &args.source)?;
    let folders: Vec<FolderRow> = source
        .folders()
        .iter()
        .map(|entry| FolderRow {
            folder: entry.folder.clone(),
            index: entry.index.clone(),
            index_exists: source.index_path(entry).is_file(),
        })
        .collect();

    match args.output {
        OutputFormat::Json => write_json(
            &FolderListing {
                manifest: source.manifest_path().display().to_string(),
                generated_at: source.manifest().generated_at.clone(),
                folders,
            },
            out,
        ),
        OutputFormat::Table => {
            write_row(out, &["folder", "index", "index_exists"]).context("write header")?;
            for row in &folders {
                let exists = if row.index_exists { "yes" } else { "no" };
                write_row(out, &[row.folder.as_str(), row.index.as_str(), exists])
                    .context("write row")?;
            }
            Ok(())
        }
    }
}
