use std::sync::Arc;

use serde::{Serialize, Serializer};
use sizewatch_config::{DEFAULT_RETENTION_CAP, HistoryConfig, WindowMode};
use sizewatch_core::{CommitRecord, FolderIndex};
use tracing::{debug, info, warn};

use crate::format::{format_size_kb, format_timestamp};
use crate::session::{MemorySessionStore, SessionStore, WINDOW_STORAGE_KEY};

/// Below this many visible samples a trend line is not meaningful.
pub const MIN_TREND_SAMPLES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistorySettings {
    pub retention_cap: usize,
    pub default_window: WindowMode,
}

impl HistorySettings {
    pub fn from_config(config: &HistoryConfig) -> Self {
        Self {
            retention_cap: config.retention_cap.max(1),
            default_window: config.default_window_mode(),
        }
    }
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            retention_cap: DEFAULT_RETENTION_CAP,
            default_window: WindowMode::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleMetadata {
    pub git_sha: String,
    pub date: Option<String>,
    pub message: String,
    pub kind: String,
    pub branch: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sample {
    pub commit_id: String,
    pub total_size_bytes: u64,
    pub committed_at_epoch_ms: i64,
    pub label: String,
    pub missing_artifacts: bool,
    pub metadata: SampleMetadata,
}

impl Sample {
    fn from_commit(commit: &CommitRecord, committed_at_epoch_ms: i64) -> Self {
        let total_size_bytes = commit
            .artifacts
            .iter()
            .fold(0u64, |total, artifact| total.saturating_add(artifact.size_bytes));

        Self {
            commit_id: commit.commit_id(),
            total_size_bytes,
            committed_at_epoch_ms,
            label: commit.label(),
            missing_artifacts: commit.artifacts.is_empty(),
            metadata: SampleMetadata {
                git_sha: commit.git_sha_or_placeholder().to_owned(),
                date: commit.date.clone(),
                message: commit.message().unwrap_or_default().to_owned(),
                kind: commit.kind.clone().unwrap_or_default(),
                branch: commit.branch.clone().unwrap_or_default(),
            },
        }
    }

    pub fn badge(&self) -> Option<&'static str> {
        sizewatch_core::kind_badge(&self.metadata.kind)
    }
}

/// Chronological samples for one folder plus the currently visible window.
///
/// Only [`HistoryEngine::hydrate`] builds a `Series`, so the window always
/// slices samples that went through ordering and truncation. The visible
/// samples are a suffix of `all_samples`.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    all_samples: Vec<Sample>,
    visible_start: usize,
    window_mode: WindowMode,
    default_window: WindowMode,
    min_size_bytes: u64,
    max_size_bytes: u64,
    gaps: usize,
    truncated: bool,
    missing_artifacts_count: usize,
    skipped_invalid_timestamp: usize,
    retention_cap: usize,
}

impl Series {
    pub fn all_samples(&self) -> &[Sample] {
        &self.all_samples
    }

    pub fn samples(&self) -> &[Sample] {
        &self.all_samples[self.visible_start..]
    }

    pub fn window_mode(&self) -> WindowMode {
        self.window_mode
    }

    /// Window used when a requested window cannot be parsed.
    pub fn default_window(&self) -> WindowMode {
        self.default_window
    }

    pub fn min_size_bytes(&self) -> u64 {
        self.min_size_bytes
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Commit records that did not make it into the series.
    pub fn gaps(&self) -> usize {
        self.gaps
    }

    pub fn missing_sample_count(&self) -> usize {
        self.gaps
    }

    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn missing_artifacts_count(&self) -> usize {
        self.missing_artifacts_count
    }

    pub fn skipped_invalid_timestamp(&self) -> usize {
        self.skipped_invalid_timestamp
    }

    pub fn retention_cap(&self) -> usize {
        self.retention_cap
    }

    pub fn is_empty(&self) -> bool {
        self.all_samples.is_empty()
    }

    pub fn position_of(&self, commit_id: &str) -> Option<usize> {
        self.samples()
            .iter()
            .position(|sample| sample.commit_id == commit_id)
    }

    pub fn set_window(&mut self, window_mode: WindowMode) {
        let count = window_mode.sample_count();
        self.window_mode = window_mode;
        self.visible_start = self.all_samples.len().saturating_sub(count);

        let visible = &self.all_samples[self.visible_start..];
        self.min_size_bytes = visible
            .iter()
            .map(|sample| sample.total_size_bytes)
            .min()
            .unwrap_or(0);
        self.max_size_bytes = visible
            .iter()
            .map(|sample| sample.total_size_bytes)
            .max()
            .unwrap_or(0);
    }

    /// Accepts a raw window string; unrecognized values become the default.
    pub fn set_window_str(&mut self, raw: &str) -> WindowMode {
        let window_mode = parse_window_or_default(raw, self.default_window);
        self.set_window(window_mode);
        window_mode
    }

    /// One-line summary used as the chart's accessible label.
    pub fn describe(&self) -> String {
        let samples = self.samples();
        let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
            return "History chart unavailable: no samples to plot.".to_owned();
        };

        let mut summary = format!(
            "History chart showing {} commits. Oldest sample {}, newest sample {}. Size range {} to {}.",
            samples.len(),
            format_timestamp(first.committed_at_epoch_ms),
            format_timestamp(last.committed_at_epoch_ms),
            format_size_kb(self.min_size_bytes),
            format_size_kb(self.max_size_bytes),
        );
        if self.truncated {
            summary.push_str(&format!(
                " History truncated to the most recent {} commits.",
                self.retention_cap
            ));
        }
        summary
    }

    /// Status lines a renderer shows above the chart.
    pub fn notices(&self) -> Vec<String> {
        if self.samples().is_empty() {
            return vec!["History data not available for this folder.".to_owned()];
        }

        let mut notices = Vec::new();
        if self.samples().len() < MIN_TREND_SAMPLES {
            notices.push(format!(
                "More history needed. At least {MIN_TREND_SAMPLES} commits are recommended to view trends."
            ));
        }
        if self.truncated {
            notices.push(format!(
                "Showing the most recent {} commits; older history is truncated.",
                self.retention_cap
            ));
        }
        if self.gaps > 0 {
            notices.push(format!(
                "{} commit entries were skipped due to missing timestamps or artifacts.",
                self.gaps
            ));
        }
        notices
    }
}

#[derive(Serialize)]
struct SeriesSnapshot<'a> {
    all_samples: &'a [Sample],
    samples: &'a [Sample],
    window_mode: WindowMode,
    min_size_bytes: u64,
    max_size_bytes: u64,
    gaps: usize,
    truncated: bool,
    missing_sample_count: usize,
    missing_artifacts_count: usize,
    skipped_invalid_timestamp: usize,
}

impl Serialize for Series {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SeriesSnapshot {
            all_samples: self.all_samples(),
            samples: self.samples(),
            window_mode: self.window_mode,
            min_size_bytes: self.min_size_bytes,
            max_size_bytes: self.max_size_bytes,
            gaps: self.gaps,
            truncated: self.truncated,
            missing_sample_count: self.gaps,
            missing_artifacts_count: self.missing_artifacts_count,
            skipped_invalid_timestamp: self.skipped_invalid_timestamp,
        }
        .serialize(serializer)
    }
}

/// Builds [`Series`] values and owns the window preference in session
/// storage. Cheap to clone; clones share the session store.
#[derive(Clone)]
pub struct HistoryEngine {
    settings: HistorySettings,
    session: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for HistoryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryEngine")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Default for HistoryEngine {
    fn default() -> Self {
        Self::with_memory_session(HistorySettings::default())
    }
}

impl HistoryEngine {
    pub fn new(settings: HistorySettings, session: Arc<dyn SessionStore>) -> Self {
        Self { settings, session }
    }

    pub fn with_memory_session(settings: HistorySettings) -> Self {
        Self::new(settings, Arc::new(MemorySessionStore::new()))
    }

    pub fn settings(&self) -> HistorySettings {
        self.settings
    }

    pub fn hydrate(&self, commits: &[CommitRecord]) -> Series {
        self.hydrate_commits(None, commits)
    }

    pub fn hydrate_folder(&self, index: &FolderIndex) -> Series {
        let folder = (!index.folder.is_empty()).then_some(index.folder.as_str());
        self.hydrate_commits(folder, &index.commits)
    }

    /// Window stored for this session, or the configured default.
    pub fn stored_window(&self) -> WindowMode {
        match self.session.get(WINDOW_STORAGE_KEY) {
            Ok(Some(raw)) => parse_window_or_default(&raw, self.settings.default_window),
            Ok(None) => self.settings.default_window,
            Err(err) => {
                warn!(error = %err, "unable to read history window preference");
                self.settings.default_window
            }
        }
    }

    pub fn persist_window(&self, window_mode: WindowMode) {
        if let Err(err) = self.session.set(WINDOW_STORAGE_KEY, window_mode.as_str()) {
            warn!(error = %err, window = %window_mode, "unable to persist history window preference");
        }
    }

    fn hydrate_commits(&self, folder: Option<&str>, commits: &[CommitRecord]) -> Series {
        let folder = folder.unwrap_or("unknown");
        let mut samples = Vec::with_capacity(commits.len());
        let mut skipped_invalid_timestamp = 0usize;
        let mut missing_artifacts_count = 0usize;

        for commit in commits {
            let Some(committed_at) = commit.committed_at() else {
                skipped_invalid_timestamp += 1;
                continue;
            };
            let sample = Sample::from_commit(commit, committed_at.timestamp_millis());
            if sample.missing_artifacts {
                missing_artifacts_count += 1;
            }
            samples.push(sample);
        }

        // Stable: equal timestamps keep their input order.
        samples.sort_by_key(|sample| sample.committed_at_epoch_ms);

        let included = samples.len();
        let retention_cap = self.settings.retention_cap.max(1);
        let truncated = included > retention_cap;
        if truncated {
            samples.drain(..included - retention_cap);
        }

        if skipped_invalid_timestamp > 0 {
            warn!(
                folder,
                skipped_invalid_timestamp, "skipped commits without valid timestamps"
            );
        }
        if missing_artifacts_count > 0 {
            warn!(
                folder,
                missing_artifacts_count, "commits missing artifact data"
            );
        }
        if truncated {
            info!(
                folder,
                retained_samples = samples.len(),
                "truncated history to most recent commits"
            );
        }

        let mut series = Series {
            all_samples: samples,
            visible_start: 0,
            window_mode: self.settings.default_window,
            default_window: self.settings.default_window,
            min_size_bytes: 0,
            max_size_bytes: 0,
            gaps: commits.len().saturating_sub(included),
            truncated,
            missing_artifacts_count,
            skipped_invalid_timestamp,
            retention_cap,
        };
        series.set_window(self.stored_window());
        debug!(
            folder,
            samples = series.all_samples.len(),
            window = %series.window_mode,
            "hydrated history series"
        );
        series
    }
}

pub(crate) fn parse_window_or_default(raw: &str, fallback: WindowMode) -> WindowMode {
    raw.parse().unwrap_or_else(|err: String| {
        warn!(error = %err, fallback = %fallback, "unrecognized history window");
        fallback
    })
}
