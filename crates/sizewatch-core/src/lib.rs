use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod ingest;
mod source;
mod validate;

pub use ingest::{coerce_size_bytes, parse_commit_timestamp};
pub use source::{
    MANIFEST_FILE_NAME, SizeReportSource, SourceError, load_folder_index, load_manifest,
};
pub use validate::{validate_history_index, validate_history_value};

pub const PLACEHOLDER_SHA: &str = "UNKNOWN";
pub const PLACEHOLDER_MESSAGE: &str = "UNKNOWN";
pub const DEFAULT_COMMIT_KIND: &str = "commit";
pub const SHORT_SHA_LEN: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Artifact {
    #[serde(default, deserialize_with = "ingest::lenient_text_or_empty")]
    pub file_name: String,
    #[serde(default, deserialize_with = "ingest::lenient_size")]
    pub size_bytes: u64,
}

impl Artifact {
    pub fn new(file_name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            file_name: file_name.into(),
            size_bytes,
        }
    }
}

/// One measured snapshot of artifact sizes. Every field is optional on the
/// wire; accessors apply the documented defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CommitRecord {
    #[serde(
        default,
        deserialize_with = "ingest::lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(
        default,
        deserialize_with = "ingest::lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(
        default,
        deserialize_with = "ingest::lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub git_sha: Option<String>,
    #[serde(
        default,
        deserialize_with = "ingest::lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub git_message: Option<String>,
    #[serde(
        default,
        deserialize_with = "ingest::lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub subject: Option<String>,
    #[serde(
        default,
        deserialize_with = "ingest::lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub branch: Option<String>,
    #[serde(
        default,
        deserialize_with = "ingest::lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "ingest::lenient_artifacts")]
    pub artifacts: Vec<Artifact>,
}

impl CommitRecord {
    /// Explicit `id`, or `kind:git_sha` with placeholders for missing parts.
    pub fn commit_id(&self) -> String {
        match non_empty(self.id.as_deref()) {
            Some(id) => id.to_owned(),
            None => format!("{}:{}", self.kind_or_default(), self.git_sha_or_placeholder()),
        }
    }

    pub fn kind_or_default(&self) -> &str {
        non_empty(self.kind.as_deref()).unwrap_or(DEFAULT_COMMIT_KIND)
    }

    pub fn kind_is(&self, kind: &str) -> bool {
        self.kind.as_deref() == Some(kind)
    }

    pub fn git_sha_or_placeholder(&self) -> &str {
        non_empty(self.git_sha.as_deref()).unwrap_or(PLACEHOLDER_SHA)
    }

    pub fn short_sha(&self) -> &str {
        short_sha(self.git_sha_or_placeholder())
    }

    /// Commit subject, skipping the `UNKNOWN` placeholder written by the
    /// report tooling.
    pub fn message(&self) -> Option<&str> {
        non_empty(self.git_message.as_deref())
            .filter(|message| *message != PLACEHOLDER_MESSAGE)
            .or_else(|| non_empty(self.subject.as_deref()))
    }

    pub fn committed_at(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(parse_commit_timestamp)
    }

    pub fn badge(&self) -> Option<&'static str> {
        kind_badge(self.kind.as_deref().unwrap_or_default())
    }

    /// Short sha followed by the message when one exists.
    pub fn label(&self) -> String {
        let sha = self.short_sha();
        match self.message() {
            Some(message) => format!("{sha} — {message}"),
            None => sha.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FolderIndex {
    #[serde(
        default,
        deserialize_with = "ingest::lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub generated_at: Option<String>,
    #[serde(default, deserialize_with = "ingest::lenient_text_or_empty")]
    pub folder: String,
    #[serde(default, deserialize_with = "ingest::lenient_commits")]
    pub commits: Vec<CommitRecord>,
}

impl FolderIndex {
    pub fn find_commit(&self, id: &str) -> Option<&CommitRecord> {
        find_commit(&self.commits, id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    pub folder: String,
    pub index: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub folders: Vec<FolderEntry>,
}

pub fn find_commit<'a>(commits: &'a [CommitRecord], id: &str) -> Option<&'a CommitRecord> {
    if id.is_empty() {
        return None;
    }
    commits.iter().find(|commit| commit.commit_id() == id)
}

pub fn short_sha(sha: &str) -> &str {
    if sha.is_empty() || sha == PLACEHOLDER_SHA {
        return PLACEHOLDER_SHA;
    }
    match sha.char_indices().nth(SHORT_SHA_LEN) {
        Some((end, _)) => &sha[..end],
        None => sha,
    }
}

pub fn kind_badge(kind: &str) -> Option<&'static str> {
    match kind.to_ascii_lowercase().as_str() {
        "head" => Some("HEAD"),
        "master" => Some("MASTER"),
        _ => None,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}
