use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::runner::DisplayMode;
use crate::telemetry::LogFormat;

pub mod commands;

#[derive(Parser)]
#[command(name = "tidycode")]
#[command(version)]
#[command(
    about = "Python project tooling: quality checks, pyproject, pre-commit and dependabot setup"
)]
#[command(long_about = "tidycode runs formatters, linters and type checkers over a Python project \
                       and keeps pyproject.toml, .pre-commit-config.yaml and dependabot.yml \
                       in shape. \
                       Get started with 'tidycode init'.")]
pub struct Cli {
    /// Log output format
    #[arg(
        long,
        value_enum,
        global = true,
        default_value_t = LogFormat::Text,
        help = "Log format on stderr (text or json)"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add the default tool sections to pyproject.toml and scaffold pre-commit
    Init {
        /// Show what would change without writing files
        #[arg(long, help = "Print the change summary without writing anything")]
        dry_run: bool,
    },
    /// Run quality tools (black, isort, ruff, mypy)
    Quality {
        #[command(subcommand)]
        action: QualityCommands,
    },
    /// Inspect and edit pyproject.toml sections
    Pyproject {
        #[command(subcommand)]
        action: PyprojectCommands,
    },
    /// Manage the dependabot configuration
    Dependabot {
        #[command(subcommand)]
        action: DependabotCommands,
    },
    /// Manage pre-commit hooks
    Hooks {
        #[command(subcommand)]
        action: HooksCommands,
    },
    /// Remove caches and build artifacts listed under [tool.tidycode.clean]
    Clean {
        #[arg(long, help = "Show what would be removed without deleting anything")]
        dry_run: bool,
        #[arg(long, short = 't', help = "Directory to clean (overrides pyproject)")]
        target: Option<PathBuf>,
        #[arg(long, short = 'e', value_delimiter = ',', help = "Comma-separated paths to keep")]
        exclude: Option<Vec<String>>,
        #[arg(
            long,
            short = 'm',
            value_enum,
            default_value_t = DisplayMode::Text,
            help = "Summary display mode"
        )]
        mode: DisplayMode,
        #[arg(long, short = 'v', help = "Report every removed item")]
        verbose: bool,
    },
}

#[derive(Subcommand)]
pub enum QualityCommands {
    /// Run the selected quality tools and print a summary
    Check {
        #[arg(long, value_delimiter = ',', help = "Comma-separated tool names (default: all)")]
        tools: Option<Vec<String>>,
        #[arg(long, short = 'c', help = "Report problems without modifying files")]
        check_only: bool,
        #[arg(long, short = 'v', help = "Show tool output in the summary")]
        verbose: bool,
        #[arg(long, overrides_with = "no_live", help = "Stream tool output (default)")]
        live: bool,
        #[arg(long, overrides_with = "live", help = "Capture tool output for the summary")]
        no_live: bool,
        #[arg(long, value_enum, help = "Summary display mode")]
        summary_mode: Option<DisplayMode>,
        #[arg(long, help = "Path passed to the tools (default: pyproject target or '.')")]
        target: Option<PathBuf>,
    },
    /// List the available quality tools
    List,
}

#[derive(Subcommand)]
pub enum PyprojectCommands {
    /// Create a section or merge keys into it
    AddSection {
        name: String,
        #[arg(long = "set", value_name = "KEY=VALUE", help = "Key to set, repeatable")]
        set: Vec<String>,
        #[arg(long, help = "Replace keys that already exist")]
        overwrite: bool,
        #[arg(long, help = "Address a top-level table instead of [tool.<name>]")]
        root: bool,
    },
    /// Set or unset keys in an existing section
    SetSection {
        name: String,
        #[arg(long = "set", value_name = "KEY=VALUE", help = "Key to set, repeatable")]
        set: Vec<String>,
        #[arg(long = "unset", value_name = "KEY", help = "Key to remove, repeatable")]
        unset: Vec<String>,
        #[arg(long, help = "Address a top-level table instead of [tool.<name>]")]
        root: bool,
    },
    /// Print one section
    ShowSection {
        name: String,
        #[arg(long, help = "Address a top-level table instead of [tool.<name>]")]
        root: bool,
    },
    /// List every table in pyproject.toml
    ListSections,
    /// Delete a section
    RemoveSection {
        name: String,
        #[arg(long, help = "Address a top-level table instead of [tool.<name>]")]
        root: bool,
    },
    /// Compare pyproject.toml with the default tool sections
    Diff,
}

#[derive(Subcommand)]
pub enum DependabotCommands {
    /// Create .github/dependabot.yml if it does not exist
    Setup {
        #[arg(long, help = "Where to write the file")]
        path: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum HooksCommands {
    /// Create .pre-commit-config.yaml if it does not exist
    Setup {
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// List configured hook ids
    List {
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Add hooks from a repository
    Add {
        repo: String,
        rev: String,
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Remove a hook from every repository
    Remove {
        id: String,
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_quality_check_flags() {
        let cli = Cli::try_parse_from([
            "tidycode", "quality", "check", "--tools", "black,ruff", "-c", "--no-live",
            "--summary-mode", "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Quality {
                action:
                    QualityCommands::Check {
                        tools,
                        check_only,
                        live,
                        no_live,
                        summary_mode,
                        ..
                    },
            } => {
                assert_eq!(tools, Some(vec!["black".to_string(), "ruff".to_string()]));
                assert!(check_only);
                assert!(!live);
                assert!(no_live);
                assert_eq!(summary_mode, Some(DisplayMode::Json));
            }
            _ => panic!("expected quality check"),
        }
    }

    #[test]
    fn test_last_live_flag_wins() {
        let cli =
            Cli::try_parse_from(["tidycode", "quality", "check", "--no-live", "--live"]).unwrap();
        match cli.command {
            Commands::Quality {
                action: QualityCommands::Check { live, no_live, .. },
            } => {
                assert!(live);
                assert!(!no_live);
            }
            _ => panic!("expected quality check"),
        }
    }

    #[test]
    fn test_global_log_format() {
        let cli = Cli::try_parse_from(["tidycode", "pyproject", "diff", "--log-format", "json"])
            .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn test_hooks_add_requires_ids() {
        assert!(Cli::try_parse_from(["tidycode", "hooks", "add", "https://x", "v1"]).is_err());
    }
}
