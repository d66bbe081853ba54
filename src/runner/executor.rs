//! Child process execution
//!
//! [`CommandExecutor`] is the seam between the runner and the operating
//! system. The runner only ever talks to the trait, so tests can swap in a
//! recording fake and assert on what would have been launched.

use async_trait::async_trait;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use super::types::{CommandSpec, OutputMode};

/// Exit code reported when the executable could not be found
pub const NOT_FOUND_EXIT_CODE: i32 = 127;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Command execution failed: {message}")]
    ExecutionFailed { message: String },
    #[error("Command not found: {command}")]
    CommandNotFound { command: String },
    #[error("IO error: {message}")]
    Io { message: String },
}

impl CommandError {
    /// Exit code recorded in the run result for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::CommandNotFound { .. } => NOT_FOUND_EXIT_CODE,
            _ => 1,
        }
    }
}

#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(
        &self,
        spec: &CommandSpec,
        mode: OutputMode,
    ) -> Result<ProcessOutcome, CommandError>;
}

/// Real implementation backed by `tokio::process`
pub struct ProcessCommandExecutor;

#[async_trait]
impl CommandExecutor for ProcessCommandExecutor {
    async fn execute(
        &self,
        spec: &CommandSpec,
        mode: OutputMode,
    ) -> Result<ProcessOutcome, CommandError> {
        let program = spec.program().ok_or_else(|| CommandError::ExecutionFailed {
            message: format!("empty command for {}", spec.display_name),
        })?;

        let mut command = Command::new(program);
        command.args(spec.args());
        if let Some(cwd) = &spec.cwd {
            command.current_dir(cwd);
        }

        match mode {
            OutputMode::Live => {
                command
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
            OutputMode::Captured => {
                command
                    .stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped());
            }
        }

        let mut child = command
            .spawn()
            .map_err(|e| spawn_error(program, e))?;

        // Drain both pipes before waiting. Read failures end up in the
        // captured text; the exit status is always collected.
        let (stdout, stderr) = tokio::join!(
            read_pipe(child.stdout.take()),
            read_pipe(child.stderr.take())
        );

        let status = child.wait().await.map_err(|e| CommandError::Io {
            message: e.to_string(),
        })?;

        Ok(ProcessOutcome {
            exit_code: status.code().unwrap_or(-1),
            stdout,
            stderr,
        })
    }
}

fn spawn_error(program: &str, error: std::io::Error) -> CommandError {
    if error.kind() == std::io::ErrorKind::NotFound {
        CommandError::CommandNotFound {
            command: program.to_string(),
        }
    } else {
        CommandError::Io {
            message: error.to_string(),
        }
    }
}

async fn read_pipe<R>(pipe: Option<R>) -> String
where
    R: tokio::io::AsyncRead + Unpin,
{
    let Some(mut pipe) = pipe else {
        return String::new();
    };

    let mut buffer = Vec::new();
    match pipe.read_to_end(&mut buffer).await {
        Ok(_) => String::from_utf8_lossy(&buffer).to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to capture child output");
            let mut text = String::from_utf8_lossy(&buffer).to_string();
            text.push_str(&format!("\n[output capture failed: {e}]"));
            text
        }
    }
}

/// Recording fake keyed by program name. Unscripted programs are reported
/// as not found.
#[cfg(test)]
pub(crate) struct MockCommandExecutor {
    responses: std::collections::HashMap<String, Result<ProcessOutcome, CommandError>>,
    calls: std::sync::Mutex<Vec<CommandSpec>>,
}

#[cfg(test)]
impl MockCommandExecutor {
    pub(crate) fn new() -> Self {
        Self {
            responses: std::collections::HashMap::new(),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn respond(
        mut self,
        program: &str,
        response: Result<ProcessOutcome, CommandError>,
    ) -> Self {
        self.responses.insert(program.to_string(), response);
        self
    }

    pub(crate) fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn programs(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|spec| spec.program().map(str::to_string))
            .collect()
    }
}

#[cfg(test)]
#[async_trait]
impl CommandExecutor for MockCommandExecutor {
    async fn execute(
        &self,
        spec: &CommandSpec,
        _mode: OutputMode,
    ) -> Result<ProcessOutcome, CommandError> {
        self.calls.lock().unwrap().push(spec.clone());
        let program = spec.program().unwrap_or_default().to_string();
        self.responses
            .get(&program)
            .cloned()
            .unwrap_or(Err(CommandError::CommandNotFound { command: program }))
    }
}
