use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use sizewatch::cli::{
    CompareArgs, FoldersArgs, HistoryArgs, OutputFormat, SourceArgs, ValidateArgs,
};
use sizewatch::compare::run_compare_command;
use sizewatch::folders::run_folders_command;
use sizewatch::history::run_history_command;
use sizewatch::validate::run_validate_command;
use sizewatch_config::{SizewatchConfig, WindowMode};
use tempfile::tempdir;

fn write_json_file(path: &Path, value: &Value) {
    fs::create_dir_all(path.parent().expect("parent dir")).expect("create dirs");
    fs::write(path, serde_json::to_string_pretty(value).expect("encode json")).expect("write json");
}

fn seed_report(workspace: &Path) {
    write_json_file(
        &workspace.join("reports/size/index.json"),
        &json!({
            "generated_at": "2024-06-01T00:00:00Z",
            "folders": [
                {"folder": "web", "index": "web/index.json"},
                {"folder": "docs", "index": "docs/index.json"}
            ]
        }),
    );
    write_json_file(
        &workspace.join("reports/size/web/index.json"),
        &json!({
            "generated_at": "2024-06-01T00:00:00Z",
            "folder": "web",
            "commits": [
                {
                    "id": "master:m1", "kind": "master", "git_sha": "m1aaaaaaaa",
                    "git_message": "Baseline", "date": "2024-05-01T00:00:00Z",
                    "artifacts": [
                        {"file_name": "app.wasm", "size_bytes": 900000},
                        {"file_name": "app.js", "size_bytes": 40000}
                    ]
                },
                {
                    "id": "branch:b1", "kind": "branch", "git_sha": "b1bbbbbbbb",
                    "git_message": "Branch point", "date": "2024-05-02T00:00:00Z",
                    "artifacts": [
                        {"file_name": "app.wasm", "size_bytes": 1000000},
                        {"file_name": "app.js", "size_bytes": 40000}
                    ]
                },
                {
                    "id": "head:h1", "kind": "head", "git_sha": "h1cccccccc",
                    "git_message": "Add feature", "date": "2024-05-03T00:00:00Z",
                    "artifacts": [
                        {"file_name": "app.wasm", "size_bytes": 1030000},
                        {"file_name": "app.js", "size_bytes": 40100},
                        {"file_name": "worker.js", "size_bytes": 1200}
                    ]
                },
                {
                    "id": "commit:bad", "kind": "commit", "git_sha": "dddddddddd",
                    "date": "sometime", "artifacts": []
                }
            ]
        }),
    );
}

fn source_args(folder: Option<&str>) -> SourceArgs {
    SourceArgs {
        source: PathBuf::from("reports/size"),
        folder: folder.map(str::to_owned),
    }
}

fn run_to_string(run: impl FnOnce(&mut Vec<u8>) -> anyhow::Result<()>) -> String {
    let mut out = Vec::new();
    run(&mut out).expect("command succeeds");
    String::from_utf8(out).expect("utf8 output")
}

#[test]
fn folders_lists_manifest_entries() {
    let temp = tempdir().expect("tempdir");
    seed_report(temp.path());

    let rendered = run_to_string(|out| {
        run_folders_command(
            temp.path(),
            FoldersArgs {
                source: PathBuf::from("reports/size/index.json"),
                output: OutputFormat::Table,
            },
            out,
        )
    });

    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "folder\tindex\tindex_exists");
    assert_eq!(lines[1], "web\tweb/index.json\tyes");
    assert_eq!(lines[2], "docs\tdocs/index.json\tno");
}

#[test]
fn history_json_reports_window_gaps_and_focus() {
    let temp = tempdir().expect("tempdir");
    seed_report(temp.path());

    let rendered = run_to_string(|out| {
        run_history_command(
            temp.path(),
            &SizewatchConfig::default(),
            HistoryArgs {
                source: source_args(Some("web")),
                window: Some(WindowMode::Last30),
                focus: Some(99),
                output: OutputFormat::Json,
            },
            out,
        )
    });
    let value: Value = serde_json::from_str(&rendered).expect("parse history json");

    assert_eq!(value["folder"], "web");
    assert_eq!(value["window"], "30");
    assert_eq!(value["series"]["gaps"], 1);
    assert_eq!(value["series"]["truncated"], false);
    assert_eq!(value["series"]["samples"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["series"]["min_size_bytes"], 940000);
    assert_eq!(value["series"]["max_size_bytes"], 1071300);
    assert_eq!(value["focused"]["index"], 2);
    assert_eq!(value["focused"]["commit_id"], "head:h1");
    assert_eq!(value["focused"]["tooltip"]["commit"], "h1ccccc");
    assert!(
        value["notices"]
            .as_array()
            .expect("notices array")
            .iter()
            .any(|notice| notice.as_str().is_some_and(|text| text.starts_with("More history")))
    );
}

#[test]
fn history_table_marks_the_focused_sample() {
    let temp = tempdir().expect("tempdir");
    seed_report(temp.path());

    let rendered = run_to_string(|out| {
        run_history_command(
            temp.path(),
            &SizewatchConfig::default(),
            HistoryArgs {
                source: source_args(None),
                window: None,
                focus: Some(0),
                output: OutputFormat::Table,
            },
            out,
        )
    });

    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(
        lines[0],
        "index\tcommit_id\tdate\tsize_bytes\tsize\tbadge\tlabel\tfocused"
    );
    assert_eq!(lines.len(), 4);
    let first: Vec<&str> = lines[1].split('\t').collect();
    assert_eq!(first[1], "master:m1");
    assert_eq!(first[5], "MASTER");
    assert_eq!(first[7], "*");
    let head: Vec<&str> = lines[3].split('\t').collect();
    assert_eq!(head[5], "HEAD");
    assert_eq!(head[7], "");
}

#[test]
fn compare_defaults_to_branch_against_head() {
    let temp = tempdir().expect("tempdir");
    seed_report(temp.path());

    let rendered = run_to_string(|out| {
        run_compare_command(
            temp.path(),
            &SizewatchConfig::default(),
            CompareArgs {
                source: source_args(Some("web")),
                base: None,
                target: None,
                output: OutputFormat::Json,
            },
            out,
        )
    });
    let value: Value = serde_json::from_str(&rendered).expect("parse compare json");

    assert_eq!(value["base"]["id"], "branch:b1");
    assert_eq!(value["target"]["id"], "head:h1");
    let names: Vec<&str> = value["rows"]
        .as_array()
        .expect("rows array")
        .iter()
        .filter_map(|row| row["file_name"].as_str())
        .collect();
    assert_eq!(names, vec!["app.js", "app.wasm", "worker.js"]);
    // app.wasm +30000 bytes, worker.js is new; app.js grows 0.25%.
    assert_eq!(value["alert_count"], 2);
    assert_eq!(value["rows"][0]["alert"], false);
    assert_eq!(value["rows"][2]["delta_percent"], 100.0);
}

#[test]
fn compare_table_uses_configured_thresholds_and_explicit_ids() {
    let temp = tempdir().expect("tempdir");
    seed_report(temp.path());
    let mut config = SizewatchConfig::default();
    config.comparison.alert_bytes = 50_000;
    config.comparison.alert_percent = 50.0;

    let rendered = run_to_string(|out| {
        run_compare_command(
            temp.path(),
            &config,
            CompareArgs {
                source: source_args(None),
                base: Some("master:m1".to_owned()),
                target: Some("head:h1".to_owned()),
                output: OutputFormat::Table,
            },
            out,
        )
    });

    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(
        lines[0],
        "file_name\tbase_bytes\ttarget_bytes\tdelta_bytes\tdelta_percent\tstatus"
    );
    assert_eq!(lines[1], "app.js\t40,000\t40,100\t+100\t+0.25%\tOK");
    assert_eq!(lines[2], "app.wasm\t900,000\t1,030,000\t+130,000\t+14.44%\tAlert");
    assert_eq!(lines[3], "worker.js\t0\t1,200\t+1,200\t+100.00%\tAlert");
}

#[test]
fn missing_folder_is_an_error() {
    let temp = tempdir().expect("tempdir");
    seed_report(temp.path());

    let mut out = Vec::new();
    let err = run_history_command(
        temp.path(),
        &SizewatchConfig::default(),
        HistoryArgs {
            source: source_args(Some("docs")),
            window: None,
            focus: None,
            output: OutputFormat::Json,
        },
        &mut out,
    )
    .expect_err("docs index is missing");
    assert!(format!("{err:#}").contains("failed to load folder history"));
}

#[test]
fn validate_reports_structural_errors() {
    let temp = tempdir().expect("tempdir");
    seed_report(temp.path());

    let mut out = Vec::new();
    let errors = run_validate_command(
        temp.path(),
        ValidateArgs {
            path: PathBuf::from("reports/size/web/index.json"),
        },
        &mut out,
    )
    .expect("validate web index");
    assert_eq!(errors, 0);
    assert!(String::from_utf8(out).expect("utf8").trim_end().ends_with(": valid"));

    write_json_file(
        &temp.path().join("broken.json"),
        &json!({"folder": "web", "commits": [{"id": 1}]}),
    );
    let mut out = Vec::new();
    let errors = run_validate_command(
        temp.path(),
        ValidateArgs {
            path: PathBuf::from("broken.json"),
        },
        &mut out,
    )
    .expect("validate broken index");
    let rendered = String::from_utf8(out).expect("utf8");
    assert_eq!(errors, rendered.lines().count());
    assert!(rendered.contains("generated_at is required at the top level"));
    assert!(rendered.contains("commits[0].id must be a string"));
}
