use std::sync::Arc;

use serde_json::{Value, json};
use sizewatch_analysis::{
    AlertThresholds, HistoryControls, HistoryEngine, HistorySettings, MemorySessionStore,
    SessionError, SessionStore, WINDOW_STORAGE_KEY, WindowMode, compare, default_comparison_pair,
    resolve_comparison_pair,
};
use sizewatch_core::FolderIndex;

struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, SessionError> {
        Err(SessionError::Unavailable("private browsing".to_owned()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), SessionError> {
        Err(SessionError::Unavailable("private browsing".to_owned()))
    }
}

fn commit_json(n: usize, date: Value) -> Value {
    json!({
        "id": format!("commit:{n:03}"),
        "kind": "commit",
        "git_sha": format!("{n:040x}"),
        "git_message": format!("Change {n}"),
        "date": date,
        "artifacts": [
            {"file_name": "app.wasm", "size_bytes": 1000 + n},
            {"file_name": "app.js", "size_bytes": "250"}
        ]
    })
}

fn index_with(commits: Vec<Value>) -> FolderIndex {
    serde_json::from_value(json!({
        "generated_at": "2024-06-01T00:00:00Z",
        "folder": "web",
        "commits": commits
    }))
    .expect("deserialize folder index")
}

fn daily(n: usize) -> Value {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
    let date = base + chrono::Days::new(n as u64);
    Value::String(format!("{date}T08:30:00+02:00"))
}

#[test]
fn shuffled_history_hydrates_in_time_order() {
    let order = [7, 2, 9, 0, 4, 1, 8, 3, 6, 5];
    let index = index_with(order.iter().map(|n| commit_json(*n, daily(*n))).collect());

    let series = HistoryEngine::default().hydrate_folder(&index);
    let ids: Vec<&str> = series
        .all_samples()
        .iter()
        .map(|sample| sample.commit_id.as_str())
        .collect();
    let expected: Vec<String> = (0..10).map(|n| format!("commit:{n:03}")).collect();
    assert_eq!(ids, expected);
    assert_eq!(series.all_samples()[0].total_size_bytes, 1250);
}

#[test]
fn two_hundred_commits_truncate_to_the_most_recent_retention_cap() {
    let index = index_with((0..200).map(|n| commit_json(n, daily(n))).collect());

    let series = HistoryEngine::default().hydrate_folder(&index);
    assert_eq!(series.all_samples().len(), 180);
    assert!(series.truncated());
    assert_eq!(series.all_samples()[0].commit_id, "commit:020");
    assert_eq!(series.all_samples()[179].commit_id, "commit:199");
    assert!(series.describe().ends_with("History truncated to the most recent 180 commits."));
}

#[test]
fn unparsable_dates_become_gaps() {
    let mut commits: Vec<Value> = (0..7).map(|n| commit_json(n, daily(n))).collect();
    commits.push(commit_json(7, json!("yesterday")));
    commits.push(commit_json(8, json!(12345)));
    commits.push(commit_json(9, Value::Null));

    let series = HistoryEngine::default().hydrate_folder(&index_with(commits));
    assert_eq!(series.gaps(), 3);
    assert_eq!(series.all_samples().len(), 7);
}

#[test]
fn repeated_window_selection_is_stable() {
    let index = index_with((0..120).map(|n| commit_json(n, daily(n))).collect());
    let mut series = HistoryEngine::default().hydrate_folder(&index);

    series.set_window_str("90");
    let once = series.samples().to_vec();
    series.set_window_str("90");
    assert_eq!(series.samples(), once.as_slice());
    assert_eq!(once.len(), 90.min(series.all_samples().len()));
}

#[test]
fn controls_clamp_focus_and_remember_the_window() {
    let store = Arc::new(MemorySessionStore::new());
    let engine = HistoryEngine::new(HistorySettings::default(), store.clone());
    let index = index_with((0..5).map(|n| commit_json(n, daily(n))).collect());

    let mut controls = HistoryControls::new(engine.clone(), engine.hydrate_folder(&index));
    assert_eq!(controls.set_active(9999), Some(4));

    controls.set_window(WindowMode::Last180);
    assert_eq!(
        store.get(WINDOW_STORAGE_KEY).expect("read store").as_deref(),
        Some("180")
    );
    assert_eq!(engine.hydrate_folder(&index).window_mode(), WindowMode::Last180);
}

#[test]
fn unavailable_storage_degrades_to_the_default_window() {
    let engine = HistoryEngine::new(HistorySettings::default(), Arc::new(UnavailableStore));
    let index = index_with((0..3).map(|n| commit_json(n, daily(n))).collect());

    let mut controls = HistoryControls::new(engine.clone(), engine.hydrate_folder(&index));
    assert_eq!(controls.window_mode(), WindowMode::Last90);
    controls.set_window(WindowMode::Last30);
    assert_eq!(controls.series().samples().len(), 3);
}

#[test]
fn undated_commits_still_compare() {
    let index = index_with(vec![
        json!({"kind": "branch", "git_sha": "b1", "artifacts": [
            {"file_name": "a", "size_bytes": 100},
            {"file_name": "b", "size_bytes": 200}
        ]}),
        json!({"kind": "head", "git_sha": "h1", "date": "not-a-date", "artifacts": [
            {"file_name": "b", "size_bytes": 250},
            {"file_name": "c", "size_bytes": 50}
        ]}),
    ]);

    let series = HistoryEngine::default().hydrate_folder(&index);
    assert_eq!(series.gaps(), 2);

    let pair = default_comparison_pair(&index.commits).expect("default pair");
    let resolved = resolve_comparison_pair(
        &index.commits,
        Some(&pair.base_id),
        Some(&pair.target_id),
    )
    .expect("resolved pair");
    let comparison = compare(
        Some(resolved.base),
        Some(resolved.target),
        &AlertThresholds::default(),
    );

    let names: Vec<&str> = comparison
        .rows
        .iter()
        .map(|row| row.file_name.as_str())
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(comparison.alert_count, 3);
}
