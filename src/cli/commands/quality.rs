use anyhow::Result;
use std::path::PathBuf;

use super::{project_dir, Command, CommandStatus};
use crate::config::ProjectSettings;
use crate::plugins::{default_registry, PluginRegistry};
use crate::quality::{run_quality_tools, QualityOptions, QUALITY_CATEGORY};
use crate::runner::{CommandExecutor, ProcessCommandExecutor};
use crate::table::TextTable;

pub struct QualityCheckCommand {
    pub pyproject: PathBuf,
    pub options: QualityOptions,
    executor: Box<dyn CommandExecutor>,
}

impl QualityCheckCommand {
    pub fn new(pyproject: PathBuf, mut options: QualityOptions) -> Self {
        if options.workdir.is_none() {
            options.workdir = project_dir(&pyproject);
        }
        Self {
            pyproject,
            options,
            executor: Box::new(ProcessCommandExecutor),
        }
    }

    pub fn with_executor(mut self, executor: Box<dyn CommandExecutor>) -> Self {
        self.executor = executor;
        self
    }
}

impl Command for QualityCheckCommand {
    async fn execute(&self) -> Result<CommandStatus> {
        let settings = ProjectSettings::load(&self.pyproject)?;
        let registry = default_registry()?;

        let report =
            run_quality_tools(&registry, self.executor.as_ref(), &settings, &self.options).await?;

        if !report.all_passed() {
            println!("❌ {} of {} tools failed", report.failed(), report.results.len());
        }
        Ok(CommandStatus::from_success(report.all_passed()))
    }
}

pub struct QualityListCommand;

impl QualityListCommand {
    pub fn render(registry: &PluginRegistry) -> String {
        let mut table = TextTable::new(&["Tool", "Category", "Scope", "Description"])
            .with_title("Quality tools");
        for plugin in registry.by_category(QUALITY_CATEGORY) {
            let meta = plugin.meta();
            table.add_row(vec![
                meta.name.clone(),
                meta.category.clone(),
                meta.scope.clone(),
                meta.description.clone(),
            ]);
        }
        table.render()
    }
}

impl Command for QualityListCommand {
    async fn execute(&self) -> Result<CommandStatus> {
        let registry = default_registry()?;
        println!("{}", Self::render(&registry));
        Ok(CommandStatus::Success)
    }
}
