//! Quality tools (formatters, linters, type checkers) and their orchestration

pub mod black;
pub mod isort;
pub mod mypy;
pub mod ruff;

use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, Instrument};

use crate::config::ProjectSettings;
use crate::plugins::{PluginRegistry, RegistryError};
use crate::runner::{
    print_summary, run_commands, CommandExecutor, CommandSpec, DisplayMode, OutputMode,
    RunOptions, RunReport,
};
use crate::telemetry::{create_tool_run_span, generate_correlation_id};

pub const QUALITY_CATEGORY: &str = "quality";
pub const STYLE_SCOPE: &str = "style";
pub const TYPE_SCOPE: &str = "type";

/// Register every built-in quality tool, in the order they run by default
pub fn register_quality_tools(registry: &mut PluginRegistry) -> Result<(), RegistryError> {
    black::register(registry)?;
    isort::register(registry)?;
    ruff::register(registry)?;
    mypy::register(registry)?;
    Ok(())
}

/// Options for one quality run, as given on the command line
#[derive(Debug, Clone)]
pub struct QualityOptions {
    /// Explicit tool names; `None` falls back to settings, then every tool
    pub tools: Option<Vec<String>>,
    pub check_only: bool,
    pub live: bool,
    pub verbose: bool,
    pub summary_mode: Option<DisplayMode>,
    pub target: Option<PathBuf>,
    /// Directory the tools are launched from
    pub workdir: Option<PathBuf>,
}

impl Default for QualityOptions {
    fn default() -> Self {
        Self {
            tools: None,
            check_only: false,
            live: true,
            verbose: false,
            summary_mode: None,
            target: None,
            workdir: None,
        }
    }
}

/// Resolved commands for a quality run. Building a plan never spawns anything.
#[derive(Debug, Clone)]
pub struct QualityPlan {
    pub specs: Vec<CommandSpec>,
    pub target: PathBuf,
    pub check_only: bool,
}

pub fn plan_quality_run(
    registry: &PluginRegistry,
    settings: &ProjectSettings,
    options: &QualityOptions,
) -> Result<QualityPlan, RegistryError> {
    let names = match (&options.tools, &settings.tools) {
        (Some(tools), _) if !tools.is_empty() => tools.clone(),
        (_, Some(tools)) if !tools.is_empty() => tools.clone(),
        _ => registry.names(QUALITY_CATEGORY),
    };

    let plugins = registry.resolve(QUALITY_CATEGORY, &names)?;

    let target = options
        .target
        .clone()
        .or_else(|| settings.target.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let check_only = options.check_only || settings.check_only;

    let specs = plugins
        .iter()
        .map(|plugin| {
            plugin
                .command_spec(Some(&target), check_only)
                .with_cwd(options.workdir.clone())
        })
        .collect();

    Ok(QualityPlan {
        specs,
        target,
        check_only,
    })
}

/// Resolve, run and summarise the requested quality tools.
///
/// Unknown tool names are reported before any process is started.
pub async fn run_quality_tools(
    registry: &PluginRegistry,
    executor: &dyn CommandExecutor,
    settings: &ProjectSettings,
    options: &QualityOptions,
) -> Result<RunReport> {
    let plan = plan_quality_run(registry, settings, options)?;

    let mode = OutputMode::from_live(options.live);
    let run_options = RunOptions::new(mode, options.verbose || settings.verbose);
    let correlation_id = generate_correlation_id();
    let span = create_tool_run_span(&correlation_id, QUALITY_CATEGORY, plan.specs.len());

    let report = async {
        info!(
            target_path = %plan.target.display(),
            check_only = plan.check_only,
            "Running quality tools"
        );
        run_commands(executor, &plan.specs, &run_options).await
    }
    .instrument(span)
    .await;

    let display_mode = options
        .summary_mode
        .unwrap_or_else(|| DisplayMode::default_for(mode));
    print_summary(&report.results, display_mode)?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::executor::MockCommandExecutor;
    use crate::runner::{ProcessOutcome, RunStatus};

    fn registry() -> PluginRegistry {
        let mut registry = PluginRegistry::new();
        register_quality_tools(&mut registry).unwrap();
        registry
    }

    fn passing(executor: MockCommandExecutor, programs: &[&str]) -> MockCommandExecutor {
        programs.iter().fold(executor, |executor, program| {
            executor.respond(
                program,
                Ok(ProcessOutcome {
                    exit_code: 0,
                    stdout: String::new(),
                    stderr: String::new(),
                }),
            )
        })
    }

    fn names(tools: &[&str]) -> Option<Vec<String>> {
        Some(tools.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn test_registration_order() {
        assert_eq!(
            registry().names(QUALITY_CATEGORY),
            vec!["black", "isort", "ruff", "mypy"]
        );
        assert_eq!(registry().by_scope(TYPE_SCOPE).len(), 1);
    }

    #[test]
    fn test_registering_twice_fails() {
        let mut registry = registry();
        assert!(matches!(
            register_quality_tools(&mut registry),
            Err(RegistryError::DuplicatePlugin { .. })
        ));
    }

    #[test]
    fn test_plan_uses_all_tools_by_default() {
        let plan = plan_quality_run(
            &registry(),
            &ProjectSettings::default(),
            &QualityOptions::default(),
        )
        .unwrap();

        let lines: Vec<String> = plan.specs.iter().map(|s| s.command_line()).collect();
        assert_eq!(
            lines,
            vec!["black .", "isort .", "ruff check . --fix", "mypy ."]
        );
        assert!(!plan.check_only);
    }

    #[test]
    fn test_plan_prefers_cli_over_settings() {
        let settings = ProjectSettings {
            tools: names(&["mypy"]),
            target: Some("pkg".to_string()),
            ..ProjectSettings::default()
        };
        let options = QualityOptions {
            tools: names(&["ruff", "black"]),
            target: Some(PathBuf::from("src")),
            ..QualityOptions::default()
        };

        let plan = plan_quality_run(&registry(), &settings, &options).unwrap();
        let lines: Vec<String> = plan.specs.iter().map(|s| s.command_line()).collect();
        assert_eq!(lines, vec!["ruff check src --fix", "black src"]);
    }

    #[test]
    fn test_plan_falls_back_to_settings() {
        let settings = ProjectSettings {
            tools: names(&["isort"]),
            target: Some("pkg".to_string()),
            check_only: true,
            ..ProjectSettings::default()
        };

        let plan = plan_quality_run(&registry(), &settings, &QualityOptions::default()).unwrap();
        assert_eq!(plan.specs[0].command, vec!["isort", "pkg", "--check-only"]);
        assert!(plan.check_only);
    }

    #[test]
    fn test_plan_sets_working_directory() {
        let options = QualityOptions {
            tools: names(&["mypy"]),
            workdir: Some(PathBuf::from("/project")),
            ..QualityOptions::default()
        };
        let plan = plan_quality_run(&registry(), &ProjectSettings::default(), &options).unwrap();
        assert_eq!(plan.specs[0].cwd, Some(PathBuf::from("/project")));
        assert_eq!(plan.specs[0].category.as_deref(), Some(QUALITY_CATEGORY));
    }

    #[tokio::test]
    async fn test_unknown_tool_spawns_nothing() {
        let executor = MockCommandExecutor::new();
        let options = QualityOptions {
            tools: names(&["black", "pylint"]),
            live: false,
            ..QualityOptions::default()
        };

        let err = run_quality_tools(
            &registry(),
            &executor,
            &ProjectSettings::default(),
            &options,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("pylint"));
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_run_reports_each_requested_tool() {
        let executor = passing(MockCommandExecutor::new(), &["black", "ruff"]);
        let options = QualityOptions {
            tools: names(&["black", "mypy", "ruff"]),
            live: false,
            check_only: true,
            summary_mode: Some(DisplayMode::Text),
            ..QualityOptions::default()
        };

        let report = run_quality_tools(
            &registry(),
            &executor,
            &ProjectSettings::default(),
            &options,
        )
        .await
        .unwrap();

        assert_eq!(executor.programs(), vec!["black", "mypy", "ruff"]);
        let statuses: Vec<_> = report.results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![RunStatus::Passed, RunStatus::Failed, RunStatus::Passed]
        );
        assert_eq!(report.results[1].exit_code, 127);
        assert_eq!(
            executor.calls()[2].command,
            vec!["ruff", "check", "."]
        );
    }
}
