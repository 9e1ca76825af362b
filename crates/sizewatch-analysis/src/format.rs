use chrono::{TimeZone, Utc};
use serde::Serialize;

use crate::history::Sample;

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// `12.3 KB` below one mebibyte, `1.2 MB` above.
pub fn format_size_kb(bytes: u64) -> String {
    let bytes = bytes as f64;
    if bytes >= MIB {
        format!("{:.1} MB", bytes / MIB)
    } else {
        format!("{:.1} KB", bytes / KIB)
    }
}

pub fn format_percent(value: Option<f64>) -> String {
    match value.filter(|value| !value.is_nan()) {
        Some(value) if value > 0.0 => format!("+{value:.2}%"),
        Some(value) => format!("{value:.2}%"),
        None => "—".to_owned(),
    }
}

pub fn format_delta(value: i64) -> String {
    let grouped = format_count(value.unsigned_abs());
    match value.signum() {
        1 => format!("+{grouped}"),
        -1 => format!("-{grouped}"),
        _ => grouped,
    }
}

/// Thousands-separated integer (`1,234,567`).
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Never produces invalid-date text: out-of-range values render as
/// `unknown date`.
pub fn format_timestamp(epoch_ms: i64) -> String {
    match Utc.timestamp_millis_opt(epoch_ms).single() {
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "unknown date".to_owned(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleTooltip {
    pub commit: String,
    pub size: String,
    pub date: String,
    pub message: String,
}

impl SampleTooltip {
    pub fn for_sample(sample: &Sample) -> Self {
        let message = if sample.metadata.message.is_empty() {
            sample.label.clone()
        } else {
            sample.metadata.message.clone()
        };
        Self {
            commit: sizewatch_core::short_sha(&sample.metadata.git_sha).to_owned(),
            size: format_size_kb(sample.total_size_bytes),
            date: format_timestamp(sample.committed_at_epoch_ms),
            message: if message.is_empty() {
                "—".to_owned()
            } else {
                message
            },
        }
    }

    /// Screen-reader text for a focusable sample.
    pub fn accessible_label(&self, badge: Option<&str>) -> String {
        let kind = badge.map(|badge| format!("{badge} commit, ")).unwrap_or_default();
        let message = if self.message == "—" {
            "no commit message"
        } else {
            self.message.as_str()
        };
        format!(
            "Commit {}, {kind}{message} on {}. Size {}.",
            self.commit, self.date, self.size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_switch_units_at_one_mebibyte() {
        assert_eq!(format_size_kb(0), "0.0 KB");
        assert_eq!(format_size_kb(1536), "1.5 KB");
        assert_eq!(format_size_kb(1024 * 1024), "1.0 MB");
        assert_eq!(format_size_kb(5 * 1024 * 1024 + 512 * 1024), "5.5 MB");
    }

    #[test]
    fn deltas_and_percents_are_signed() {
        assert_eq!(format_delta(1_234_567), "+1,234,567");
        assert_eq!(format_delta(-100), "-100");
        assert_eq!(format_delta(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");

        assert_eq!(format_percent(Some(25.0)), "+25.00%");
        assert_eq!(format_percent(Some(-3.456)), "-3.46%");
        assert_eq!(format_percent(Some(0.0)), "0.00%");
        assert_eq!(format_percent(None), "—");
        assert_eq!(format_percent(Some(f64::NAN)), "—");
    }

    #[test]
    fn timestamps_render_in_utc_or_a_placeholder() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00 UTC");
        assert_eq!(format_timestamp(i64::MAX), "unknown date");
    }
}
