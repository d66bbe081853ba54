//! File system operations abstraction for testing
//!
//! Scaffolding and cleanup go through [`FileSystemOperations`] so tests can
//! swap in `MockFileSystemOperations` and assert on exactly what would have
//! been written or removed.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tidycode::fs::{FileSystemOperations, StandardFileSystem};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let fs_ops = StandardFileSystem;
//!     fs_ops.create_dir_all(Path::new(".github")).await?;
//!     fs_ops.write(Path::new(".github/dependabot.yml"), b"version: 2\n").await?;
//!     assert!(fs_ops.exists(Path::new(".github/dependabot.yml")));
//!     Ok(())
//! }
//! ```
use anyhow::Result;
use std::path::Path;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

/// Trait for file system operations that can be mocked in tests
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait::async_trait]
pub trait FileSystemOperations: Send + Sync {
    /// Create a directory and all its parent directories
    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Write data to a file, creating the file if it doesn't exist
    async fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;

    async fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Remove a single file
    async fn remove_file(&self, path: &Path) -> Result<()>;

    /// Remove a directory and everything below it
    async fn remove_dir_all(&self, path: &Path) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;
}

/// Production implementation backed by `tokio::fs`
pub struct StandardFileSystem;

#[async_trait::async_trait]
impl FileSystemOperations for StandardFileSystem {
    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path).await.map_err(Into::into)
    }

    async fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        tokio::fs::write(path, contents).await.map_err(Into::into)
    }

    async fn read_to_string(&self, path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path).await.map_err(Into::into)
    }

    async fn remove_file(&self, path: &Path) -> Result<()> {
        tokio::fs::remove_file(path).await.map_err(Into::into)
    }

    async fn remove_dir_all(&self, path: &Path) -> Result<()> {
        tokio::fs::remove_dir_all(path).await.map_err(Into::into)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}
