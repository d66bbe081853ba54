use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

use tidycode::clean::CleanOptions;
use tidycode::cli::commands::{
    clean::CleanCommand,
    dependabot::DependabotSetupCommand,
    hooks::{HooksAction, HooksCommand},
    init::InitCommand,
    pyproject::PyprojectCommand,
    quality::{QualityCheckCommand, QualityListCommand},
    Command, CommandStatus,
};
use tidycode::cli::{Cli, Commands, DependabotCommands, HooksCommands, QualityCommands};
use tidycode::config::{config, TidycodeConfig};
use tidycode::fs::{FileSystemOperations, StandardFileSystem};
use tidycode::quality::QualityOptions;
use tidycode::telemetry::init_telemetry;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(status) => status.exit_code(),
        Err(e) => {
            eprintln!("❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<CommandStatus> {
    let config = config()?;
    init_telemetry(cli.log_format, &config.output.log_level)?;

    tokio::runtime::Runtime::new()?.block_on(async { dispatch(cli.command, config).await })
}

async fn dispatch(command: Commands, config: &TidycodeConfig) -> Result<CommandStatus> {
    let fs_ops: Arc<dyn FileSystemOperations> = Arc::new(StandardFileSystem);
    let pyproject = config.paths.pyproject.clone();

    match command {
        Commands::Init { dry_run } => {
            InitCommand::new(pyproject, config.paths.pre_commit.clone(), dry_run, fs_ops)
                .execute()
                .await
        }
        Commands::Quality { action } => match action {
            QualityCommands::Check {
                tools,
                check_only,
                verbose,
                live: _,
                no_live,
                summary_mode,
                target,
            } => {
                let options = QualityOptions {
                    tools,
                    check_only,
                    live: !no_live,
                    verbose,
                    summary_mode: summary_mode.or(config.output.summary_mode),
                    target,
                    workdir: None,
                };
                QualityCheckCommand::new(pyproject, options).execute().await
            }
            QualityCommands::List => QualityListCommand.execute().await,
        },
        Commands::Pyproject { action } => PyprojectCommand::new(pyproject, action).execute().await,
        Commands::Dependabot { action } => match action {
            DependabotCommands::Setup { path } => {
                let path = path.unwrap_or_else(|| config.paths.dependabot.clone());
                DependabotSetupCommand::new(path, fs_ops).execute().await
            }
        },
        Commands::Hooks { action } => {
            let (path, action) = match action {
                HooksCommands::Setup { path } => (path, HooksAction::Setup),
                HooksCommands::List { path } => (path, HooksAction::List),
                HooksCommands::Add {
                    repo,
                    rev,
                    ids,
                    path,
                } => (path, HooksAction::Add { repo, rev, ids }),
                HooksCommands::Remove { id, path } => (path, HooksAction::Remove { id }),
            };
            let path = path.unwrap_or_else(|| config.paths.pre_commit.clone());
            HooksCommand::new(path, action, fs_ops).execute().await
        }
        Commands::Clean {
            dry_run,
            target,
            exclude,
            mode,
            verbose,
        } => {
            let options = CleanOptions {
                dry_run,
                target,
                excludes: exclude,
                verbose,
            };
            CleanCommand::new(pyproject, options, mode, fs_ops).execute().await
        }
    }
}
