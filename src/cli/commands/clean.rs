use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use super::{project_dir, Command, CommandStatus};
use crate::clean::{run_clean, CleanOptions};
use crate::config::ProjectSettings;
use crate::fs::FileSystemOperations;
use crate::runner::{print_summary, DisplayMode};

pub struct CleanCommand {
    pub pyproject: PathBuf,
    pub options: CleanOptions,
    pub mode: DisplayMode,
    fs_ops: Arc<dyn FileSystemOperations>,
}

impl CleanCommand {
    pub fn new(
        pyproject: PathBuf,
        options: CleanOptions,
        mode: DisplayMode,
        fs_ops: Arc<dyn FileSystemOperations>,
    ) -> Self {
        Self {
            pyproject,
            options,
            mode,
            fs_ops,
        }
    }
}

impl Command for CleanCommand {
    async fn execute(&self) -> Result<CommandStatus> {
        let settings = ProjectSettings::load(&self.pyproject)?;
        let mut clean = settings.clean;
        // a relative target in pyproject is relative to the project, not the shell
        if let (Some(target), Some(dir)) = (&clean.target, project_dir(&self.pyproject)) {
            clean.target = Some(dir.join(target).to_string_lossy().into_owned());
        }

        if self.options.dry_run {
            println!("🔍 Dry run: nothing will be removed");
        }
        let report = run_clean(self.fs_ops.as_ref(), &clean, &self.options).await?;

        print_summary(&report.results, self.mode)?;
        println!();
        println!("--- JSON Summary ---");
        println!("{}", report.to_json()?);

        Ok(CommandStatus::from_success(report.totals.errors == 0))
    }
}
