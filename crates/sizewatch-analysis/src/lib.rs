mod compare;
mod controls;
mod format;
mod history;
mod scroll;
mod selection;
mod session;

pub use compare::{
    AlertThresholds, Comparison, ComparisonRow, ZERO_BASE_GROWTH_PERCENT, compare,
    compare_artifacts, locale_order,
};
pub use controls::{ControlsObserver, HistoryControls, NavKey};
pub use format::{
    SampleTooltip, format_count, format_delta, format_percent, format_size_kb,
    format_timestamp,
};
pub use history::{
    HistoryEngine, HistorySettings, MIN_TREND_SAMPLES, Sample, SampleMetadata, Series,
};
pub use scroll::{DRAG_THRESHOLD_PX, PointerRelease, ScrollStrip};
pub use selection::{
    CommitPair, ResolvedPair, default_comparison_pair, resolve_comparison_pair,
};
pub use session::{MemorySessionStore, SessionError, SessionStore, WINDOW_STORAGE_KEY};
pub use sizewatch_config::WindowMode;
