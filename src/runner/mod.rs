//! Subprocess runner: launches commands, aggregates results, prints summaries

pub mod batch;
pub mod display;
pub mod executor;
pub mod types;

pub use batch::{run_command, run_commands, status_from_exit_code, RunOptions};
pub use display::{print_summary, render_summary};
pub use executor::{CommandError, CommandExecutor, ProcessCommandExecutor, ProcessOutcome};
pub use types::{CommandSpec, DisplayMode, OutputMode, RunReport, RunResult, RunStatus};
