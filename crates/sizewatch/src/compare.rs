use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use sizewatch_analysis::{
    AlertThresholds, Comparison, ComparisonRow, compare, default_comparison_pair, format_count,
    format_delta, format_percent, format_timestamp, resolve_comparison_pair,
};
use sizewatch_config::SizewatchConfig;
use sizewatch_core::{CommitRecord, PLACEHOLDER_SHA};

use crate::cli::{CompareArgs, OutputFormat};
use crate::open_report_source;
use crate::output::{write_json, write_row};

#[derive(Debug, Serialize)]
struct CompareReport<'a> {
    folder: &'a str,
    base: Option<CommitSummary>,
    target: Option<CommitSummary>,
    thresholds: AlertThresholds,
    alert_count: usize,
    rows: &'a [ComparisonRow],
}

#[derive(Debug, Serialize)]
struct CommitSummary {
    id: String,
    git_sha: String,
    message: String,
    date: String,
}

impl CommitSummary {
    fn new(commit: &CommitRecord) -> Self {
        let date = match commit.committed_at() {
            Some(committed_at) => format_timestamp(committed_at.timestamp_millis()),
            None => "—".to_owned(),
        };
        Self {
            id: commit.commit_id(),
            git_sha: commit
                .git_sha
                .clone()
                .filter(|sha| !sha.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_SHA.to_owned()),
            message: commit.message().unwrap_or("—").to_owned(),
            date,
        }
    }
}

pub fn run_compare_command(
    workspace: &Path,
    config: &SizewatchConfig,
    args: CompareArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let source = open_report_source(workspace, &args.source.source)?;
    let index = source
        .load_folder(args.source.folder.as_deref())
        .context("failed to load folder history")?;
    let thresholds = AlertThresholds::from_config(&config.comparison);

    let defaults = default_comparison_pair(&index.commits);
    let base_id = args
        .base
        .or_else(|| defaults.as_ref().map(|pair| pair.base_id.clone()));
    let target_id = args
        .target
        .or_else(|| defaults.as_ref().map(|pair| pair.target_id.clone()));

    let resolved =
        resolve_comparison_pair(&index.commits, base_id.as_deref(), target_id.as_deref());
    let comparison = match resolved {
        Some(pair) => compare(Some(pair.base), Some(pair.target), &thresholds),
        None => {
            tracing::warn!(folder = %index.folder, "folder has no commits to compare");
            Comparison::default()
        }
    };
    let base = resolved.map(|pair| CommitSummary::new(pair.base));
    let target = resolved.map(|pair| CommitSummary::new(pair.target));

    match args.output {
        OutputFormat::Json => write_json(
            &CompareReport {
                folder: &index.folder,
                base,
                target,
                thresholds,
                alert_count: comparison.alert_count,
                rows: &comparison.rows,
            },
            out,
        ),
        OutputFormat::Table => {
            write_comparison_table(&comparison, out).context("failed to write comparison")?;
            if let (Some(base), Some(target)) = (base, target) {
                eprintln!(
                    "COMPARE: base={} ({}) target={} ({})",
                    base.id, base.date, target.id, target.date
                );
            } else {
                eprintln!("COMPARE: no commits available for this folder");
            }
            eprintln!("COMPARE: alerts={}", comparison.alert_count);
            Ok(())
        }
    }
}

pub fn write_comparison_table(
    comparison: &Comparison,
    out: &mut dyn Write,
) -> std::io::Result<()> {
    write_row(
        out,
        &[
            "file_name",
            "base_bytes",
            "target_bytes",
            "delta_bytes",
            "delta_percent",
            "status",
        ],
    )?;

    for row in &comparison.rows {
        let base = format_count(row.base_size);
        let target = format_count(row.target_size);
        let delta = format_delta(row.delta_bytes);
        let percent = format_percent(row.delta_percent);
        let file_name = if row.file_name.is_empty() {
            "(missing)"
        } else {
            row.file_name.as_str()
        };
        write_row(
            out,
            &[
                file_name,
                base.as_str(),
                target.as_str(),
                delta.as_str(),
                percent.as_str(),
                if row.alert { "Alert" } else { "OK" },
            ],
        )?;
    }

    Ok(())
}
