// tidycode library - Python project tooling
// Exposes the core components for the CLI and for integration tests

pub mod changelog;
pub mod clean;
pub mod cli;
pub mod config;
pub mod documents;
pub mod fs;
pub mod plugins;
pub mod pre_commit;
pub mod pyproject;
pub mod quality;
pub mod runner;
pub mod scaffold;
pub mod table;
pub mod telemetry;

// Re-export key types for easy access
pub use changelog::{ChangeAction, ChangeEntry, ChangeLog};
pub use config::{config, ProjectSettings, TidycodeConfig};
pub use documents::{TomlError, TomlFileManager, YamlError, YamlFileManager};
pub use plugins::{default_registry, PluginMeta, PluginRegistry, RegistryError, ToolRunner};
pub use pre_commit::PreCommitManager;
pub use quality::{plan_quality_run, run_quality_tools, QualityOptions, QualityPlan};
pub use runner::{
    CommandError, CommandExecutor, CommandSpec, DisplayMode, OutputMode, ProcessCommandExecutor,
    ProcessOutcome, RunReport, RunResult, RunStatus,
};
pub use telemetry::{create_tool_run_span, generate_correlation_id, init_telemetry, LogFormat};
