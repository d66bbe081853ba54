use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

pub mod clean;
pub mod dependabot;
pub mod hooks;
pub mod init;
pub mod pyproject;
pub mod quality;

/// Whether a command did what it was asked to. A fatal problem is an `Err`
/// instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failed,
}

impl CommandStatus {
    pub fn from_success(success: bool) -> Self {
        if success {
            CommandStatus::Success
        } else {
            CommandStatus::Failed
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            CommandStatus::Success => ExitCode::SUCCESS,
            CommandStatus::Failed => ExitCode::FAILURE,
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<CommandStatus>;
}

/// Directory the project files live in, i.e. the parent of `pyproject`
pub fn project_dir(pyproject: &Path) -> Option<PathBuf> {
    pyproject
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
}
