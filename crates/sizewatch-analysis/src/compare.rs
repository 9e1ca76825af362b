use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use sizewatch_config::{ComparisonConfig, DEFAULT_ALERT_BYTES, DEFAULT_ALERT_PERCENT};
use sizewatch_core::{Artifact, CommitRecord};

/// Reported growth when a file goes from zero bytes to a positive size.
/// Every such jump shows as the same percentage regardless of magnitude.
pub const ZERO_BASE_GROWTH_PERCENT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlertThresholds {
    pub bytes: u64,
    pub percent: f64,
}

impl AlertThresholds {
    pub fn from_config(config: &ComparisonConfig) -> Self {
        Self {
            bytes: config.alert_bytes,
            percent: config.alert_percent,
        }
    }

    fn exceeded(&self, delta_bytes: i64, delta_percent: Option<f64>) -> bool {
        delta_bytes.unsigned_abs() >= self.bytes
            || delta_percent.is_some_and(|percent| percent.abs() >= self.percent)
    }
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            bytes: DEFAULT_ALERT_BYTES,
            percent: DEFAULT_ALERT_PERCENT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub file_name: String,
    pub base_size: u64,
    pub target_size: u64,
    pub delta_bytes: i64,
    pub delta_percent: Option<f64>,
    pub alert: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Comparison {
    pub rows: Vec<ComparisonRow>,
    pub alert_count: usize,
}

impl Comparison {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Per-file deltas between two commits. A missing side yields an empty
/// comparison.
pub fn compare(
    base: Option<&CommitRecord>,
    target: Option<&CommitRecord>,
    thresholds: &AlertThresholds,
) -> Comparison {
    match (base, target) {
        (Some(base), Some(target)) => {
            compare_artifacts(&base.artifacts, &target.artifacts, thresholds)
        }
        _ => Comparison::default(),
    }
}

/// One row per file name present on either side, absent sides count as
/// zero. Duplicate names within one side keep the last size listed.
pub fn compare_artifacts(
    base: &[Artifact],
    target: &[Artifact],
    thresholds: &AlertThresholds,
) -> Comparison {
    let base_sizes = size_lookup(base);
    let target_sizes = size_lookup(target);

    let mut file_names: Vec<&str> = base_sizes
        .keys()
        .chain(target_sizes.keys())
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    file_names.sort_by(|left, right| locale_order(left, right));

    let rows: Vec<ComparisonRow> = file_names
        .into_iter()
        .map(|file_name| {
            let base_size = base_sizes.get(file_name).copied().unwrap_or(0);
            let target_size = target_sizes.get(file_name).copied().unwrap_or(0);
            let delta_bytes = signed_delta(base_size, target_size);
            let delta_percent = delta_percent(base_size, target_size, delta_bytes);
            ComparisonRow {
                file_name: file_name.to_owned(),
                base_size,
                target_size,
                delta_bytes,
                delta_percent,
                alert: thresholds.exceeded(delta_bytes, delta_percent),
            }
        })
        .collect();

    let alert_count = rows.iter().filter(|row| row.alert).count();
    Comparison { rows, alert_count }
}

/// Whitespace and punctuation in root collation order, then symbols.
const SYMBOL_ORDER: &str = "\t\n\u{b}\u{c}\r _-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// File-name ordering modelled on root collation: punctuation sorts before
/// digits, digits before letters, and letters compare case-insensitively with
/// lowercase first on ties. So `main.js`, `main_bg.wasm`, `main-x.js` and
/// `Main.js` list as `main_bg.wasm`, `main-x.js`, `main.js`, `Main.js`.
/// Characters outside ASCII sort after letters by code point.
pub fn locale_order(left: &str, right: &str) -> Ordering {
    let primary = primary_weights(left).cmp(primary_weights(right));
    primary
        .then_with(|| uppercase_flags(left).cmp(uppercase_flags(right)))
        .then_with(|| left.cmp(right))
}

fn primary_weights(value: &str) -> impl Iterator<Item = u32> + '_ {
    value.chars().flat_map(char::to_lowercase).map(primary_weight)
}

fn uppercase_flags(value: &str) -> impl Iterator<Item = bool> + '_ {
    value
        .chars()
        .flat_map(|ch| ch.to_lowercase().map(move |_| ch.is_uppercase()))
}

fn primary_weight(ch: char) -> u32 {
    if let Some(position) = SYMBOL_ORDER.chars().position(|symbol| symbol == ch) {
        return position as u32;
    }
    match ch {
        '0'..='9' => 100 + (ch as u32 - '0' as u32),
        'a'..='z' => 200 + (ch as u32 - 'a' as u32),
        _ => 1000 + ch as u32,
    }
}

fn size_lookup(artifacts: &[Artifact]) -> HashMap<&str, u64> {
    artifacts
        .iter()
        .map(|artifact| (artifact.file_name.as_str(), artifact.size_bytes))
        .collect()
}

fn signed_delta(base: u64, target: u64) -> i64 {
    let delta = i128::from(target) - i128::from(base);
    i64::try_from(delta).unwrap_or(if delta < 0 { i64::MIN } else { i64::MAX })
}

fn delta_percent(base: u64, target: u64, delta_bytes: i64) -> Option<f64> {
    if base > 0 {
        Some(delta_bytes as f64 / base as f64 * 100.0)
    } else if target > 0 {
        Some(ZERO_BASE_GROWTH_PERCENT)
    } else {
        None
    }
}
