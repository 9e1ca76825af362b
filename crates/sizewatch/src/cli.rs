use std::ffi::OsStr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sizewatch_config::WindowMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "invalid log format '{other}', expected one of: human, json"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "invalid output format '{other}', expected one of: table, json"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct SourceArgs {
    #[arg(
        long,
        default_value = ".",
        help = "Size report manifest, or the directory holding index.json (relative to --workspace)"
    )]
    pub source: PathBuf,

    #[arg(long, help = "Folder to load; defaults to the first folder in the manifest")]
    pub folder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct FoldersArgs {
    #[arg(
        long,
        default_value = ".",
        help = "Size report manifest, or the directory holding index.json (relative to --workspace)"
    )]
    pub source: PathBuf,

    #[arg(
        long,
        default_value = "table",
        value_parser = parse_output_format,
        help = "Output format: table or json"
    )]
    pub output: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(
        long,
        value_parser = parse_window_mode,
        help = "Visible window: 30, 90, or 180 samples. Defaults to the configured window"
    )]
    pub window: Option<WindowMode>,

    #[arg(
        long,
        help = "Index of the visible sample to focus (clamped to the last sample)"
    )]
    pub focus: Option<usize>,

    #[arg(
        long,
        default_value = "table",
        value_parser = parse_output_format,
        help = "Output format: table or json"
    )]
    pub output: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(long, help = "Base commit id; defaults to a branch commit")]
    pub base: Option<String>,

    #[arg(long, help = "Target commit id; defaults to the head commit")]
    pub target: Option<String>,

    #[arg(
        long,
        default_value = "table",
        value_parser = parse_output_format,
        help = "Output format: table or json"
    )]
    pub output: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct ValidateArgs {
    #[arg(help = "Folder history index to check")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// List folders in a size report manifest
    Folders(FoldersArgs),
    /// Show the windowed size history for one folder
    History(HistoryArgs),
    /// Compare artifact sizes between two commits
    Compare(CompareArgs),
    /// Check a folder history index for structural problems
    Validate(ValidateArgs),
}

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Build artifact size history and comparison")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = ".",
        help = "Workspace root holding .sizewatch/config.toml"
    )]
    pub workspace: PathBuf,

    #[arg(
        long,
        global = true,
        default_value = "human",
        value_parser = parse_log_format,
        help = "Log format: human or json"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

pub fn parse_cli() -> Cli {
    let mut args: Vec<_> = std::env::args_os().collect();
    if args.get(1).is_some_and(|arg| arg == OsStr::new("--")) {
        args.remove(1);
    }

    Cli::parse_from(args)
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse()
}

fn parse_output_format(value: &str) -> Result<OutputFormat, String> {
    value.parse()
}

fn parse_window_mode(value: &str) -> Result<WindowMode, String> {
    value.parse()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::*;

    #[test]
    fn history_subcommand_parses_window_focus_and_output() {
        let cli = Cli::try_parse_from([
            "sizewatch",
            "--workspace",
            "/tmp/ws",
            "history",
            "--source",
            "reports/size",
            "--folder",
            "web",
            "--window",
            "30",
            "--focus",
            "4",
            "--output",
            "json",
        ])
        .expect("history should parse");

        assert_eq!(cli.workspace, PathBuf::from("/tmp/ws"));
        match cli.command {
            Commands::History(args) => {
                assert_eq!(args.source.source, PathBuf::from("reports/size"));
                assert_eq!(args.source.folder.as_deref(), Some("web"));
                assert_eq!(args.window, Some(WindowMode::Last30));
                assert_eq!(args.focus, Some(4));
                assert_eq!(args.output.as_str(), "json");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn compare_subcommand_parses_with_defaults() {
        let cli = Cli::try_parse_from(["sizewatch", "compare", "--log-format", "json"])
            .expect("compare should parse");

        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Commands::Compare(args) => {
                assert_eq!(args.source.source, PathBuf::from("."));
                assert_eq!(args.base, None);
                assert_eq!(args.target, None);
                assert_eq!(args.output, OutputFormat::Table);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn validate_requires_a_path() {
        assert!(Cli::try_parse_from(["sizewatch", "validate"]).is_err());
        let cli = Cli::try_parse_from(["sizewatch", "validate", "web/index.json"])
            .expect("validate should parse");
        assert!(matches!(cli.command, Commands::Validate(_)));
    }

    #[test]
    fn rejects_unknown_window_and_output() {
        let err = Cli::try_parse_from(["sizewatch", "history", "--window", "45"])
            .expect_err("expected window error");
        assert!(err.to_string().contains("invalid window '45'"));

        assert!(Cli::try_parse_from(["sizewatch", "folders", "--output", "csv"]).is_err());
    }
}
