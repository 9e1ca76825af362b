use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::{FolderEntry, FolderIndex, Manifest};

pub const MANIFEST_FILE_NAME: &str = "index.json";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no folders available in manifest {0}")]
    NoFolders(PathBuf),
    #[error("folder '{folder}' is not listed in manifest {manifest}")]
    UnknownFolder { folder: String, manifest: PathBuf },
}

pub fn load_manifest(path: impl AsRef<Path>) -> Result<Manifest, SourceError> {
    read_json(path.as_ref())
}

pub fn load_folder_index(path: impl AsRef<Path>) -> Result<FolderIndex, SourceError> {
    read_json(path.as_ref())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SourceError> {
    let raw = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SourceError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// A size-report tree: the top-level manifest plus the folder indexes it
/// points at. Index paths are resolved relative to the manifest file.
#[derive(Debug, Clone)]
pub struct SizeReportSource {
    manifest_path: PathBuf,
    manifest: Manifest,
}

impl SizeReportSource {
    /// Accepts either the manifest file itself or the directory holding
    /// `index.json`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let manifest_path = if path.is_dir() {
            path.join(MANIFEST_FILE_NAME)
        } else {
            path.to_path_buf()
        };
        let manifest = load_manifest(&manifest_path)?;
        if manifest.folders.is_empty() {
            return Err(SourceError::NoFolders(manifest_path));
        }

        Ok(Self {
            manifest_path,
            manifest,
        })
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    pub fn folders(&self) -> &[FolderEntry] {
        &self.manifest.folders
    }

    /// Named folder, or the first listed folder when `folder` is `None`.
    pub fn resolve(&self, folder: Option<&str>) -> Result<&FolderEntry, SourceError> {
        let entry = match folder {
            Some(name) => self.manifest.folders.iter().find(|entry| entry.folder == name),
            None => self.manifest.folders.first(),
        };
        entry.ok_or_else(|| SourceError::UnknownFolder {
            folder: folder.unwrap_or_default().to_owned(),
            manifest: self.manifest_path.clone(),
        })
    }

    pub fn index_path(&self, entry: &FolderEntry) -> PathBuf {
        let base = self.manifest_path.parent().unwrap_or_else(|| Path::new("."));
        base.join(&entry.index)
    }

    pub fn load_folder(&self, folder: Option<&str>) -> Result<FolderIndex, SourceError> {
        let entry = self.resolve(folder)?;
        let mut index = load_folder_index(self.index_path(entry))?;
        if index.folder.is_empty() {
            index.folder = entry.folder.clone();
        }
        Ok(index)
    }
}
