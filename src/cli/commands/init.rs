//! `tidycode init`
//!
//! Existing configuration is never overwritten: default tool sections are
//! merged key by key, and `.pre-commit-config.yaml` is only created when it
//! is missing.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use super::{Command, CommandStatus};
use crate::documents::TomlFileManager;
use crate::fs::FileSystemOperations;
use crate::pyproject::apply_default_tools;
use crate::scaffold::{setup_pre_commit, ScaffoldOutcome};

pub struct InitCommand {
    pub pyproject: PathBuf,
    pub pre_commit: PathBuf,
    pub dry_run: bool,
    fs_ops: Arc<dyn FileSystemOperations>,
}

impl InitCommand {
    pub fn new(
        pyproject: PathBuf,
        pre_commit: PathBuf,
        dry_run: bool,
        fs_ops: Arc<dyn FileSystemOperations>,
    ) -> Self {
        Self {
            pyproject,
            pre_commit,
            dry_run,
            fs_ops,
        }
    }
}

impl Command for InitCommand {
    async fn execute(&self) -> Result<CommandStatus> {
        if self.dry_run {
            println!("🚀 TIDYCODE INIT (DRY RUN)");
        } else {
            println!("🚀 TIDYCODE INIT");
        }

        let mut manager = TomlFileManager::load_or_default(&self.pyproject)?;
        let changes = apply_default_tools(&mut manager)?;
        println!("{}", changes.render());

        if self.dry_run {
            println!("🔍 Dry run: {} left untouched", self.pyproject.display());
            return Ok(CommandStatus::Success);
        }

        manager
            .save()
            .with_context(|| format!("Failed to update {}", self.pyproject.display()))?;
        println!("✅ Updated {}", self.pyproject.display());

        match setup_pre_commit(self.fs_ops.as_ref(), &self.pre_commit).await? {
            ScaffoldOutcome::Created => println!("✅ Created {}", self.pre_commit.display()),
            ScaffoldOutcome::Skipped => {
                println!("ℹ️  {} already exists, skipped", self.pre_commit.display())
            }
        }

        Ok(CommandStatus::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{MockFileSystemOperations, StandardFileSystem};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_writes_defaults_and_pre_commit() {
        let dir = TempDir::new().unwrap();
        let pyproject = dir.path().join("pyproject.toml");
        let pre_commit = dir.path().join(".pre-commit-config.yaml");
        std::fs::write(&pyproject, "[project]\nname = \"demo\"\n").unwrap();

        let command = InitCommand::new(
            pyproject.clone(),
            pre_commit.clone(),
            false,
            Arc::new(StandardFileSystem),
        );
        assert_eq!(command.execute().await.unwrap(), CommandStatus::Success);

        let content = std::fs::read_to_string(&pyproject).unwrap();
        assert!(content.starts_with("[project]\nname = \"demo\"\n"));
        assert!(content.contains("[tool.black]"));
        assert!(content.contains("[tool.tidycode.clean]"));
        assert!(pre_commit.exists());
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let pyproject = dir.path().join("pyproject.toml");

        let mut mock_fs = MockFileSystemOperations::new();
        mock_fs.expect_write().never();
        mock_fs.expect_create_dir_all().never();

        let command = InitCommand::new(
            pyproject.clone(),
            dir.path().join(".pre-commit-config.yaml"),
            true,
            Arc::new(mock_fs),
        );
        assert_eq!(command.execute().await.unwrap(), CommandStatus::Success);
        assert!(!pyproject.exists());
    }

    #[tokio::test]
    async fn test_invalid_pyproject_is_fatal() {
        let dir = TempDir::new().unwrap();
        let pyproject = dir.path().join("pyproject.toml");
        std::fs::write(&pyproject, "[tool\n").unwrap();

        let command = InitCommand::new(
            pyproject.clone(),
            dir.path().join(".pre-commit-config.yaml"),
            false,
            Arc::new(StandardFileSystem),
        );
        assert!(command.execute().await.is_err());
        assert_eq!(std::fs::read_to_string(&pyproject).unwrap(), "[tool\n");
    }
}
