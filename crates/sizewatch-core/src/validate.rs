use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

const REQUIRED_COMMIT_FIELDS: &[&str] = &["id", "git_sha", "date", "artifacts"];

/// Structural checks on a folder history index. Returns one message per
/// problem; an empty list means the file is valid.
pub fn validate_history_index(path: impl AsRef<Path>) -> Vec<String> {
    let path = path.as_ref();
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return vec![format!("{} does not exist", path.display())];
        }
        Err(err) => return vec![format!("{} could not be read: {err}", path.display())],
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(value) => validate_history_value(&value),
        Err(err) => vec![format!("{} is not valid JSON: {err}", path.display())],
    }
}

pub fn validate_history_value(value: &Value) -> Vec<String> {
    let Some(document) = value.as_object() else {
        return vec!["index must contain a JSON object at the top level".to_owned()];
    };

    let mut errors = Vec::new();
    if !document.contains_key("generated_at") {
        errors.push("generated_at is required at the top level".to_owned());
    }
    if !document.contains_key("folder") {
        errors.push("folder is required at the top level".to_owned());
    }
    match document.get("commits").and_then(Value::as_array) {
        Some(commits) => {
            for (index, commit) in commits.iter().enumerate() {
                validate_commit(commit, index, &mut errors);
            }
        }
        None => errors.push("commits must be an array at the top level".to_owned()),
    }

    errors
}

fn validate_commit(commit: &Value, index: usize, errors: &mut Vec<String>) {
    let prefix = format!("commits[{index}]");
    let Some(commit) = commit.as_object() else {
        errors.push(format!("{prefix} must be an object"));
        return;
    };

    for field in REQUIRED_COMMIT_FIELDS {
        if !commit.contains_key(*field) {
            errors.push(format!("{prefix}.{field} is required"));
        }
    }
    expect_string_or_null(commit, "id", &prefix, "must be a string", errors);
    expect_string_or_null(commit, "git_sha", &prefix, "must be a string", errors);
    expect_string_or_null(
        commit,
        "date",
        &prefix,
        "must be an ISO timestamp string",
        errors,
    );

    // A missing `artifacts` key yields both the required and the type message.
    let Some(artifacts) = commit.get("artifacts").and_then(Value::as_array) else {
        errors.push(format!("{prefix}.artifacts must be an array"));
        return;
    };
    for (idx, artifact) in artifacts.iter().enumerate() {
        let path = format!("{prefix}.artifacts[{idx}]");
        let Some(artifact) = artifact.as_object() else {
            errors.push(format!("{path} must be an object"));
            continue;
        };
        let file_name_ok = artifact
            .get("file_name")
            .and_then(Value::as_str)
            .is_some_and(|name| !name.is_empty());
        if !file_name_ok {
            errors.push(format!("{path}.file_name must be a non-empty string"));
        }
        if artifact.get("size_bytes").and_then(Value::as_u64).is_none() {
            errors.push(format!("{path}.size_bytes must be a non-negative integer"));
        }
    }
}

fn expect_string_or_null(
    commit: &Map<String, Value>,
    field: &str,
    prefix: &str,
    message: &str,
    errors: &mut Vec<String>,
) {
    match commit.get(field) {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(_) => errors.push(format!("{prefix}.{field} {message}")),
    }
}
