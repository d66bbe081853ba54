use anyhow::Result;
use std::path::PathBuf;

use super::{Command, CommandStatus};
use crate::changelog::ChangeLog;
use crate::cli::PyprojectCommands;
use crate::documents::TomlFileManager;
use crate::pyproject::{
    add_section, diff_with_defaults, format_section_diff, list_sections, parse_assignment,
    remove_section, set_section, show_section, SectionScope,
};

pub struct PyprojectCommand {
    pub path: PathBuf,
    pub action: PyprojectCommands,
}

impl PyprojectCommand {
    pub fn new(path: PathBuf, action: PyprojectCommands) -> Self {
        Self { path, action }
    }

    fn load(&self) -> Result<TomlFileManager> {
        Ok(TomlFileManager::load(&self.path)?)
    }

    fn save_and_report(&self, manager: &TomlFileManager, changes: &ChangeLog) -> Result<()> {
        if !changes.is_empty() {
            manager.save()?;
        }
        println!("{}", changes.render());
        Ok(())
    }

    /// Run the action and return the text left to print
    pub fn run(&self) -> Result<String> {
        let output = match &self.action {
            PyprojectCommands::AddSection {
                name,
                set,
                overwrite,
                root,
            } => {
                let assignments = parse_all(set)?;
                let mut manager = self.load()?;
                let changes = add_section(
                    &mut manager,
                    name,
                    SectionScope::from_root_flag(*root),
                    &assignments,
                    *overwrite,
                )?;
                self.save_and_report(&manager, &changes)?;
                String::new()
            }
            PyprojectCommands::SetSection {
                name,
                set,
                unset,
                root,
            } => {
                let assignments = parse_all(set)?;
                let mut manager = self.load()?;
                let changes = set_section(
                    &mut manager,
                    name,
                    SectionScope::from_root_flag(*root),
                    &assignments,
                    unset,
                )?;
                self.save_and_report(&manager, &changes)?;
                String::new()
            }
            PyprojectCommands::ShowSection { name, root } => {
                show_section(&self.load()?, name, SectionScope::from_root_flag(*root))?
            }
            PyprojectCommands::ListSections => {
                let sections = list_sections(&self.load()?);
                if sections.is_empty() {
                    "No sections found.".to_string()
                } else {
                    sections.join("\n")
                }
            }
            PyprojectCommands::RemoveSection { name, root } => {
                let scope = SectionScope::from_root_flag(*root);
                let mut manager = self.load()?;
                let changes = remove_section(&mut manager, name, scope)?;
                manager.save()?;
                format!(
                    "{}\n🗑️  Removed section [{}]",
                    changes.render(),
                    scope.key(name)?
                )
            }
            PyprojectCommands::Diff => {
                let entries = diff_with_defaults(&self.load()?)?;
                if entries.is_empty() {
                    "✅ pyproject.toml already has every default section.".to_string()
                } else {
                    format_section_diff(&entries)
                }
            }
        };
        Ok(output)
    }
}

fn parse_all(raw: &[String]) -> Result<Vec<(String, toml_edit::Value)>> {
    raw.iter()
        .map(|assignment| parse_assignment(assignment).map_err(Into::into))
        .collect()
}

impl Command for PyprojectCommand {
    async fn execute(&self) -> Result<CommandStatus> {
        let output = self.run()?;
        if !output.is_empty() {
            println!("{output}");
        }
        Ok(CommandStatus::Success)
    }
}
