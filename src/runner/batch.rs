use std::time::Instant;
use tracing::{info, warn};

use super::executor::{CommandError, CommandExecutor, ProcessOutcome};
use super::types::{CommandSpec, OutputMode, RunReport, RunResult, RunStatus};

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub mode: OutputMode,
    pub verbose: bool,
}

impl RunOptions {
    pub fn new(mode: OutputMode, verbose: bool) -> Self {
        Self { mode, verbose }
    }
}

/// Derive a status from an exit code.
///
/// ruff exits 1 after applying every fix, with `All done` in its output;
/// that run counts as passed.
pub fn status_from_exit_code(display_name: &str, exit_code: i32, stdout: &str) -> RunStatus {
    if display_name.eq_ignore_ascii_case("ruff") && exit_code == 1 && stdout.contains("All done") {
        return RunStatus::Passed;
    }

    if exit_code == 0 {
        RunStatus::Passed
    } else {
        RunStatus::Failed
    }
}

pub fn build_result(spec: &CommandSpec, outcome: ProcessOutcome, duration_ms: u64) -> RunResult {
    let status = status_from_exit_code(&spec.display_name, outcome.exit_code, &outcome.stdout);
    RunResult {
        display_name: spec.display_name.clone(),
        category: spec.category.clone(),
        status,
        exit_code: outcome.exit_code,
        stdout: outcome.stdout.trim().to_string(),
        stderr: outcome.stderr.trim().to_string(),
        summary: Some(summarize(status, outcome.exit_code)),
        details: None,
        is_tool: spec.is_tool,
        duration_ms,
    }
}

/// Standard failed result for a command that could not be run at all
pub fn result_from_error(spec: &CommandSpec, error: &CommandError, duration_ms: u64) -> RunResult {
    let exit_code = error.exit_code();
    RunResult {
        display_name: spec.display_name.clone(),
        category: spec.category.clone(),
        status: RunStatus::Failed,
        exit_code,
        stdout: String::new(),
        stderr: error.to_string(),
        summary: Some(summarize(RunStatus::Failed, exit_code)),
        details: Some(spec.command_line()),
        is_tool: spec.is_tool,
        duration_ms,
    }
}

fn summarize(status: RunStatus, exit_code: i32) -> String {
    match status {
        RunStatus::Passed => "completed without issues".to_string(),
        RunStatus::Warning => format!("completed with warnings (exit {exit_code})"),
        RunStatus::Failed => format!("exited with code {exit_code}"),
    }
}

/// Run a single command and turn whatever happens into a [`RunResult`]
pub async fn run_command(
    executor: &dyn CommandExecutor,
    spec: &CommandSpec,
    options: &RunOptions,
) -> RunResult {
    if options.verbose || options.mode == OutputMode::Live {
        println!("▶️  Running {}: {}", spec.display_name, spec.command_line());
    }

    info!(tool = %spec.display_name, command = %spec.command_line(), "Starting tool");
    let started = Instant::now();
    let outcome = executor.execute(spec, options.mode).await;
    let duration_ms = started.elapsed().as_millis() as u64;

    let result = match outcome {
        Ok(outcome) => build_result(spec, outcome, duration_ms),
        Err(e) => {
            warn!(tool = %spec.display_name, error = %e, "Tool could not be run");
            if options.verbose {
                println!("⚠️  {e}");
            }
            result_from_error(spec, &e, duration_ms)
        }
    };

    info!(
        tool = %result.display_name,
        exit_code = result.exit_code,
        duration_ms = result.duration_ms,
        "Tool finished"
    );

    if options.mode == OutputMode::Live {
        match result.status {
            RunStatus::Failed => println!(
                "❌ {} failed (exit {})",
                result.display_name, result.exit_code
            ),
            _ => println!("✅ {} passed", result.display_name),
        }
    } else if options.verbose {
        if !result.stdout.is_empty() {
            println!("{}", result.stdout);
        }
        if !result.stderr.is_empty() {
            eprintln!("{}", result.stderr);
        }
    }

    result
}

/// Run commands one after another, in order.
///
/// A failing command never stops the batch; every spec gets a result.
pub async fn run_commands(
    executor: &dyn CommandExecutor,
    specs: &[CommandSpec],
    options: &RunOptions,
) -> RunReport {
    let mut results = Vec::with_capacity(specs.len());
    for spec in specs {
        results.push(run_command(executor, spec, options).await);
    }
    RunReport::new(results)
}
