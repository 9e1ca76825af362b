use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SIZEWATCH_DIR_NAME: &str = ".sizewatch";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_RETENTION_CAP: usize = 180;
pub const DEFAULT_ALERT_BYTES: u64 = 25_000;
pub const DEFAULT_ALERT_PERCENT: f64 = 2.0;

/// Trailing sample count shown by the history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WindowMode {
    #[serde(rename = "30")]
    Last30,
    #[default]
    #[serde(rename = "90")]
    Last90,
    #[serde(rename = "180")]
    Last180,
}

impl WindowMode {
    pub const ALL: [WindowMode; 3] = [Self::Last30, Self::Last90, Self::Last180];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Last30 => "30",
            Self::Last90 => "90",
            Self::Last180 => "180",
        }
    }

    pub fn sample_count(self) -> usize {
        match self {
            Self::Last30 => 30,
            Self::Last90 => 90,
            Self::Last180 => 180,
        }
    }

    /// Unrecognized values fall back to the default window.
    pub fn normalize(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for WindowMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WindowMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "30" => Ok(Self::Last30),
            "90" => Ok(Self::Last90),
            "180" => Ok(Self::Last180),
            other => Err(format!(
                "invalid window '{other}', expected one of: 30, 90, 180"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SizewatchConfig {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub comparison: ComparisonConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_retention_cap")]
    pub retention_cap: usize,
    #[serde(default = "default_window")]
    pub default_window: String,
}

impl HistoryConfig {
    pub fn default_window_mode(&self) -> WindowMode {
        WindowMode::normalize(&self.default_window)
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            retention_cap: DEFAULT_RETENTION_CAP,
            default_window: default_window(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonConfig {
    #[serde(default = "default_alert_bytes")]
    pub alert_bytes: u64,
    #[serde(default = "default_alert_percent")]
    pub alert_percent: f64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            alert_bytes: DEFAULT_ALERT_BYTES,
            alert_percent: DEFAULT_ALERT_PERCENT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("failed to serialize config TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub fn sizewatch_dir(workspace_root: impl AsRef<Path>) -> PathBuf {
    workspace_root.as_ref().join(SIZEWATCH_DIR_NAME)
}

pub fn config_path(workspace_root: impl AsRef<Path>) -> PathBuf {
    sizewatch_dir(workspace_root).join(CONFIG_FILE_NAME)
}

pub fn load_workspace_config(
    workspace_root: impl AsRef<Path>,
) -> Result<SizewatchConfig, ConfigError> {
    let path = config_path(workspace_root);
    if !path.exists() {
        return Ok(SizewatchConfig::default());
    }

    let raw = fs::read_to_string(path)?;
    let parsed: SizewatchConfig = toml::from_str(&raw)?;
    Ok(normalize_config(parsed))
}

pub fn ensure_workspace_config(
    workspace_root: impl AsRef<Path>,
) -> Result<SizewatchConfig, ConfigError> {
    let workspace_root = workspace_root.as_ref();
    fs::create_dir_all(sizewatch_dir(workspace_root))?;

    let path = config_path(workspace_root);
    if path.exists() {
        return load_workspace_config(workspace_root);
    }

    let config = SizewatchConfig::default();
    let content = toml::to_string_pretty(&config)?;
    fs::write(path, content)?;

    Ok(config)
}

/// Reports values that `normalize_config` will replace. Call it on the raw
/// parsed config so the warnings describe what the user wrote.
pub fn validate_config(config: &SizewatchConfig) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.history.retention_cap == 0 {
        warnings.push(ConfigWarning {
            code: "history.retention_cap",
            message: format!(
                "retention_cap must be at least 1, using {DEFAULT_RETENTION_CAP}"
            ),
        });
    }
    if let Err(err) = config.history.default_window.parse::<WindowMode>() {
        warnings.push(ConfigWarning {
            code: "history.default_window",
            message: format!("{err}; using {}", WindowMode::default()),
        });
    }
    let percent = config.comparison.alert_percent;
    if !percent.is_finite() || percent < 0.0 {
        warnings.push(ConfigWarning {
            code: "comparison.alert_percent",
            message: format!(
                "alert_percent must be a non-negative number, using {DEFAULT_ALERT_PERCENT}"
            ),
        });
    }

    warnings
}

pub fn load_raw_workspace_config(
    workspace_root: impl AsRef<Path>,
) -> Result<SizewatchConfig, ConfigError> {
    let path = config_path(workspace_root);
    if !path.exists() {
        return Ok(SizewatchConfig::default());
    }
    let raw = fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

fn default_retention_cap() -> usize {
    DEFAULT_RETENTION_CAP
}

fn default_window() -> String {
    WindowMode::default().as_str().to_owned()
}

fn default_alert_bytes() -> u64 {
    DEFAULT_ALERT_BYTES
}

fn default_alert_percent() -> f64 {
    DEFAULT_ALERT_PERCENT
}

fn normalize_config(mut config: SizewatchConfig) -> SizewatchConfig {
    if config.history.retention_cap == 0 {
        config.history.retention_cap = DEFAULT_RETENTION_CAP;
    }
    config.history.default_window = config.history.default_window_mode().as_str().to_owned();

    let percent = config.comparison.alert_percent;
    if !percent.is_finite() || percent < 0.0 {
        config.comparison.alert_percent = DEFAULT_ALERT_PERCENT;
    }

    config
}
