use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use super::{Command, CommandStatus};
use crate::documents::{YamlError, YamlFileManager};
use crate::fs::FileSystemOperations;
use crate::pre_commit::{PreCommitManager, DEFAULT_REV};
use crate::scaffold::{setup_pre_commit, ScaffoldOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HooksAction {
    Setup,
    List,
    Add {
        repo: String,
        rev: String,
        ids: Vec<String>,
    },
    Remove {
        id: String,
    },
}

pub struct HooksCommand {
    pub path: PathBuf,
    pub action: HooksAction,
    fs_ops: Arc<dyn FileSystemOperations>,
}

impl HooksCommand {
    pub fn new(path: PathBuf, action: HooksAction, fs_ops: Arc<dyn FileSystemOperations>) -> Self {
        Self {
            path,
            action,
            fs_ops,
        }
    }

    fn load(&self) -> Result<PreCommitManager> {
        Ok(PreCommitManager::load(&self.path, DEFAULT_REV)?)
    }

    /// Like [`HooksCommand::load`], but a missing file starts an empty config
    fn load_or_empty(&self) -> Result<PreCommitManager> {
        match YamlFileManager::load(&self.path) {
            Ok(yaml) => Ok(PreCommitManager::from_yaml(yaml, DEFAULT_REV)),
            Err(YamlError::NotFound(_)) => Ok(PreCommitManager::from_yaml(
                YamlFileManager::parse(self.path.clone(), "")?,
                DEFAULT_REV,
            )),
            Err(e) => Err(e.into()),
        }
    }
}

impl Command for HooksCommand {
    async fn execute(&self) -> Result<CommandStatus> {
        match &self.action {
            HooksAction::Setup => match setup_pre_commit(self.fs_ops.as_ref(), &self.path).await? {
                ScaffoldOutcome::Created => println!("✅ Created {}", self.path.display()),
                ScaffoldOutcome::Skipped => {
                    println!("ℹ️  {} already exists, skipped", self.path.display())
                }
            },
            HooksAction::List => {
                let hooks = self.load()?.list_hooks();
                if hooks.is_empty() {
                    println!("No hooks configured.");
                }
                for id in hooks {
                    println!("  • {id}");
                }
            }
            HooksAction::Add { repo, rev, ids } => {
                let mut manager = self.load_or_empty()?;
                let added = manager.add_hooks(repo, rev, ids);
                manager.save()?;
                println!("✅ Added {added} hook(s) from {repo}");
            }
            HooksAction::Remove { id } => {
                let mut manager = self.load()?;
                let removed = manager.remove_hook(id);
                if removed == 0 {
                    println!("⚠️  Hook '{id}' not found");
                    return Ok(CommandStatus::Failed);
                }
                manager.save()?;
                println!("🗑️  Removed hook '{id}'");
            }
        }
        Ok(CommandStatus::Success)
    }
}
