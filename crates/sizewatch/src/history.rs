use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use sizewatch_analysis::{
    HistoryControls, HistoryEngine, HistorySettings, Sample, SampleTooltip, Series, WindowMode,
    format_size_kb, format_timestamp,
};
use sizewatch_config::SizewatchConfig;

use crate::cli::{HistoryArgs, OutputFormat};
use crate::open_report_source;
use crate::output::{write_json, write_row};

#[derive(Debug, Serialize)]
struct HistoryReport<'a> {
    folder: &'a str,
    window: WindowMode,
    description: String,
    notices: Vec<String>,
    focused: Option<FocusedSample>,
    series: &'a Series,
}

#[derive(Debug, Serialize)]
struct FocusedSample {
    index: usize,
    commit_id: String,
    tooltip: SampleTooltip,
    accessible_label: String,
}

impl FocusedSample {
    fn new(index: usize, sample: &Sample) -> Self {
        let tooltip = SampleTooltip::for_sample(sample);
        let accessible_label = tooltip.accessible_label(sample.badge());
        Self {
            index,
            commit_id: sample.commit_id.clone(),
            tooltip,
            accessible_label,
        }
    }
}

pub fn run_history_command(
    workspace: &Path,
    config: &SizewatchConfig,
    args: HistoryArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let source = open_report_source(workspace, &args.source.source)?;
    let index = source
        .load_folder(args.source.folder.as_deref())
        .context("failed to load folder history")?;

    let engine = HistoryEngine::with_memory_session(HistorySettings::from_config(&config.history));
    let series = engine.hydrate_folder(&index);
    let mut controls = HistoryControls::new(engine, series);
    if let Some(window) = args.window {
        controls.set_window(window);
    }
    if let Some(focus) = args.focus {
        controls.set_active(focus);
    }

    let focused = controls
        .active_index()
        .zip(controls.active_sample())
        .map(|(index, sample)| FocusedSample::new(index, sample));
    let series = controls.series();

    match args.output {
        OutputFormat::Json => write_json(
            &HistoryReport {
                folder: &index.folder,
                window: series.window_mode(),
                description: series.describe(),
                notices: series.notices(),
                focused,
                series,
            },
            out,
        ),
        OutputFormat::Table => {
            write_history_table(series, controls.active_index(), out)
                .context("failed to write history table")?;
            for notice in series.notices() {
                eprintln!("HISTORY: {notice}");
            }
            if let Some(focused) = focused {
                eprintln!("HISTORY: focused {}", focused.accessible_label);
            }
            Ok(())
        }
    }
}

pub fn write_history_table(
    series: &Series,
    active: Option<usize>,
    out: &mut dyn Write,
) -> std::io::Result<()> {
    write_row(
        out,
        &[
            "index",
            "commit_id",
            "date",
            "size_bytes",
            "size",
            "badge",
            "label",
            "focused",
        ],
    )?;

    for (index, sample) in series.samples().iter().enumerate() {
        let mut label = sample.label.clone();
        if sample.missing_artifacts {
            label.push_str(" (no artifacts)");
        }
        let position = index.to_string();
        let date = format_timestamp(sample.committed_at_epoch_ms);
        let size_bytes = sample.total_size_bytes.to_string();
        let size = format_size_kb(sample.total_size_bytes);
        write_row(
            out,
            &[
                position.as_str(),
                sample.commit_id.as_str(),
                date.as_str(),
                size_bytes.as_str(),
                size.as_str(),
                sample.badge().unwrap_or(""),
                label.as_str(),
                if active == Some(index) { "*" } else { "" },
            ],
        )?;
    }

    Ok(())
}
