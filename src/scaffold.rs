//! Template scaffolding for files tidycode creates but never overwrites

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::fs::FileSystemOperations;

pub const DEPENDABOT_TEMPLATE: &str = r#"version: 2
updates:
  - package-ecosystem: "pip"
    directory: "/"
    schedule:
      interval: "weekly"
    open-pull-requests-limit: 10

  - package-ecosystem: "github-actions"
    directory: "/"
    schedule:
      interval: "weekly"
"#;

pub const PRE_COMMIT_TEMPLATE: &str = r#"repos:
  - repo: https://github.com/pre-commit/pre-commit-hooks
    rev: v4.6.0
    hooks:
      - id: trailing-whitespace
      - id: end-of-file-fixer
      - id: check-yaml
      - id: check-toml

  - repo: https://github.com/psf/black
    rev: 24.4.2
    hooks:
      - id: black

  - repo: https://github.com/pycqa/isort
    rev: 5.13.2
    hooks:
      - id: isort

  - repo: https://github.com/astral-sh/ruff-pre-commit
    rev: v0.4.4
    hooks:
      - id: ruff
        args: [--fix]

  - repo: https://github.com/pre-commit/mirrors-mypy
    rev: v1.10.0
    hooks:
      - id: mypy
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaffoldOutcome {
    Created,
    /// The file already existed and was left untouched
    Skipped,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScaffoldError {
    #[error("Failed to create directory {}: {message}", .path.display())]
    CreateDir { path: PathBuf, message: String },
    #[error("Failed to write {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },
}

/// Write `template` to `path` unless the file already exists
pub async fn scaffold_file(
    fs_ops: &dyn FileSystemOperations,
    path: &Path,
    template: &str,
) -> Result<ScaffoldOutcome, ScaffoldError> {
    if fs_ops.exists(path) {
        info!(path = %path.display(), "File already exists, skipping");
        return Ok(ScaffoldOutcome::Skipped);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_ops
            .create_dir_all(parent)
            .await
            .map_err(|e| ScaffoldError::CreateDir {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
    }

    fs_ops
        .write(path, template.as_bytes())
        .await
        .map_err(|e| ScaffoldError::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    info!(path = %path.display(), "Created file from template");
    Ok(ScaffoldOutcome::Created)
}

pub async fn setup_dependabot(
    fs_ops: &dyn FileSystemOperations,
    path: &Path,
) -> Result<ScaffoldOutcome, ScaffoldError> {
    scaffold_file(fs_ops, path, DEPENDABOT_TEMPLATE).await
}

pub async fn setup_pre_commit(
    fs_ops: &dyn FileSystemOperations,
    path: &Path,
) -> Result<ScaffoldOutcome, ScaffoldError> {
    scaffold_file(fs_ops, path, PRE_COMMIT_TEMPLATE).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{MockFileSystemOperations, StandardFileSystem};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_dependabot_created_then_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".github").join("dependabot.yml");

        let outcome = setup_dependabot(&StandardFileSystem, &path).await.unwrap();
        assert_eq!(outcome, ScaffoldOutcome::Created);

        let first = std::fs::read(&path).unwrap();
        let text = String::from_utf8(first.clone()).unwrap();
        assert!(text.contains("version: 2"));
        assert!(text.contains("pip"));

        let outcome = setup_dependabot(&StandardFileSystem, &path).await.unwrap();
        assert_eq!(outcome, ScaffoldOutcome::Skipped);
        assert_eq!(std::fs::read(&path).unwrap(), first);
    }

    #[tokio::test]
    async fn test_existing_file_is_never_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".pre-commit-config.yaml");
        std::fs::write(&path, "repos: []\n").unwrap();

        let outcome = setup_pre_commit(&StandardFileSystem, &path).await.unwrap();
        assert_eq!(outcome, ScaffoldOutcome::Skipped);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "repos: []\n");
    }

    #[test]
    fn test_templates_are_valid_yaml() {
        let dependabot: serde_yaml::Value = serde_yaml::from_str(DEPENDABOT_TEMPLATE).unwrap();
        assert_eq!(dependabot["version"], serde_yaml::Value::from(2));
        assert_eq!(dependabot["updates"].as_sequence().unwrap().len(), 2);

        let pre_commit: serde_yaml::Value = serde_yaml::from_str(PRE_COMMIT_TEMPLATE).unwrap();
        let ids: Vec<&str> = pre_commit["repos"]
            .as_sequence()
            .unwrap()
            .iter()
            .flat_map(|repo| repo["hooks"].as_sequence().unwrap())
            .filter_map(|hook| hook["id"].as_str())
            .collect();
        for tool in ["black", "isort", "ruff", "mypy"] {
            assert!(ids.contains(&tool), "missing hook {tool}");
        }
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let mut mock_fs = MockFileSystemOperations::new();
        mock_fs.expect_exists().return_const(false);
        mock_fs
            .expect_create_dir_all()
            .withf(|path| path.ends_with(".github"))
            .times(1)
            .returning(|_| Ok(()));
        mock_fs
            .expect_write()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("disk full")));

        let err = setup_dependabot(&mock_fs, Path::new(".github/dependabot.yml"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::Write { .. }));
        assert!(err.to_string().contains("disk full"));
    }

    #[tokio::test]
    async fn test_existing_path_skips_all_writes() {
        let mut mock_fs = MockFileSystemOperations::new();
        mock_fs.expect_exists().return_const(true);
        mock_fs.expect_write().never();
        mock_fs.expect_create_dir_all().never();

        let outcome = setup_pre_commit(&mock_fs, Path::new(".pre-commit-config.yaml"))
            .await
            .unwrap();
        assert_eq!(outcome, ScaffoldOutcome::Skipped);
    }
}
