use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use super::{Command, CommandStatus};
use crate::fs::FileSystemOperations;
use crate::scaffold::{setup_dependabot, ScaffoldOutcome};

pub struct DependabotSetupCommand {
    pub path: PathBuf,
    fs_ops: Arc<dyn FileSystemOperations>,
}

impl DependabotSetupCommand {
    pub fn new(path: PathBuf, fs_ops: Arc<dyn FileSystemOperations>) -> Self {
        Self { path, fs_ops }
    }
}

impl Command for DependabotSetupCommand {
    async fn execute(&self) -> Result<CommandStatus> {
        match setup_dependabot(self.fs_ops.as_ref(), &self.path).await? {
            ScaffoldOutcome::Created => println!("✅ Created {}", self.path.display()),
            ScaffoldOutcome::Skipped => {
                println!("ℹ️  {} already exists, skipped", self.path.display())
            }
        }
        Ok(CommandStatus::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystemOperations;

    #[tokio::test]
    async fn test_setup_uses_configured_path() {
        let mut mock_fs = MockFileSystemOperations::new();
        mock_fs.expect_exists().return_const(false);
        mock_fs
            .expect_create_dir_all()
            .withf(|path| path.ends_with("ci"))
            .times(1)
            .returning(|_| Ok(()));
        mock_fs
            .expect_write()
            .withf(|path, contents| {
                path.ends_with("ci/dependabot.yml")
                    && String::from_utf8_lossy(contents).contains("version: 2")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let command =
            DependabotSetupCommand::new(PathBuf::from("ci/dependabot.yml"), Arc::new(mock_fs));
        assert_eq!(command.execute().await.unwrap(), CommandStatus::Success);
    }
}
