use anyhow::{Context, Result};
use sizewatch::cli::{Cli, Commands, parse_cli};
use sizewatch::compare::run_compare_command;
use sizewatch::folders::run_folders_command;
use sizewatch::history::run_history_command;
use sizewatch::logging::init_logging;
use sizewatch::validate::run_validate_command;
use sizewatch_config::{
    config_path, load_raw_workspace_config, load_workspace_config, validate_config,
};

fn main() -> Result<()> {
    let cli = parse_cli();
    init_logging(cli.log_format);
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let workspace = cli.workspace.canonicalize().with_context(|| {
        format!(
            "failed to resolve workspace path {}",
            cli.workspace.display()
        )
    })?;

    let raw_config = load_raw_workspace_config(&workspace).with_context(|| {
        format!(
            "failed to load workspace config at {}",
            config_path(&workspace).display()
        )
    })?;
    for warning in validate_config(&raw_config) {
        eprintln!(
            "sizewatch config warning [{}]: {}",
            warning.code, warning.message
        );
    }
    let config =
        load_workspace_config(&workspace).context("failed to normalize workspace config")?;

    let mut out = std::io::stdout();
    match cli.command {
        Commands::Folders(args) => run_folders_command(&workspace, args, &mut out),
        Commands::History(args) => run_history_command(&workspace, &config, args, &mut out),
        Commands::Compare(args) => run_compare_command(&workspace, &config, args, &mut out),
        Commands::Validate(args) => {
            let error_count = run_validate_command(&workspace, args, &mut out)?;
            if error_count > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
