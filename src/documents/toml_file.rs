//! Format-preserving TOML editing on top of `toml_edit`
//!
//! Comments, key order and whitespace of untouched parts of the document
//! survive a load/save cycle.

use std::path::{Path, PathBuf};
use thiserror::Error;
use toml_edit::{DocumentMut, Item, Table, TableLike};
use tracing::debug;

use super::{join_dot_key, split_dot_key};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TomlError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    #[error("IO error on {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },
    #[error("Invalid key path: '{0}'")]
    InvalidPath(String),
    #[error("Section [{0}] not found")]
    SectionNotFound(String),
    #[error("Expected key=value, got '{0}'")]
    InvalidAssignment(String),
}

/// A TOML file held in memory as an editable document
#[derive(Debug, Clone)]
pub struct TomlFileManager {
    path: PathBuf,
    document: DocumentMut,
}

impl TomlFileManager {
    /// Load and parse `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TomlError> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TomlError::NotFound(path.clone())
            } else {
                TomlError::Io {
                    path: path.clone(),
                    message: e.to_string(),
                }
            }
        })?;
        Self::parse(path, &content)
    }

    /// Like [`TomlFileManager::load`], but a missing file gives an empty document
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, TomlError> {
        match Self::load(path.as_ref()) {
            Err(TomlError::NotFound(path)) => {
                debug!(path = %path.display(), "Starting an empty TOML document");
                Ok(Self {
                    path,
                    document: DocumentMut::new(),
                })
            }
            other => other,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self, TomlError> {
        let path = path.into();
        let document = content
            .parse::<DocumentMut>()
            .map_err(|e| TomlError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?;
        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &DocumentMut {
        &self.document
    }

    fn resolve(dot_key: &str) -> Result<(Vec<String>, String), TomlError> {
        split_dot_key(dot_key).ok_or_else(|| TomlError::InvalidPath(dot_key.to_string()))
    }

    fn navigate(&self, path: &[String]) -> Option<&dyn TableLike> {
        let mut current: &dyn TableLike = self.document.as_table();
        for part in path {
            current = current.get(part)?.as_table_like()?;
        }
        Some(current)
    }

    fn navigate_mut(&mut self, path: &[String], create: bool) -> Option<&mut dyn TableLike> {
        let mut current: &mut dyn TableLike = self.document.as_table_mut();
        for part in path {
            let is_table = current.get(part).is_some_and(Item::is_table_like);
            if !is_table {
                if !create {
                    return None;
                }
                current.insert(part, Item::Table(implicit_table()));
            }
            current = current.get_mut(part)?.as_table_like_mut()?;
        }
        Some(current)
    }

    // Keys

    pub fn get_key(&self, dot_key: &str) -> Result<Option<&Item>, TomlError> {
        let (path, key) = Self::resolve(dot_key)?;
        Ok(self.navigate(&path).and_then(|table| table.get(&key)))
    }

    pub fn has_key(&self, dot_key: &str) -> Result<bool, TomlError> {
        Ok(self.get_key(dot_key)?.is_some())
    }

    /// Set a value, creating intermediate tables. With `overwrite` unset an
    /// existing key is left alone. Returns whether the document changed.
    pub fn set_key(
        &mut self,
        dot_key: &str,
        value: impl Into<Item>,
        overwrite: bool,
    ) -> Result<bool, TomlError> {
        let (path, key) = Self::resolve(dot_key)?;
        let table = self
            .navigate_mut(&path, true)
            .ok_or_else(|| TomlError::InvalidPath(dot_key.to_string()))?;

        if !overwrite && table.contains_key(&key) {
            return Ok(false);
        }
        table.insert(&key, value.into());
        Ok(true)
    }

    /// Remove a key. Returns whether it existed.
    pub fn delete_key(&mut self, dot_key: &str) -> Result<bool, TomlError> {
        let (path, key) = Self::resolve(dot_key)?;
        Ok(self
            .navigate_mut(&path, false)
            .and_then(|table| table.remove(&key))
            .is_some())
    }

    // Sections

    pub fn get_section(&self, dot_key: &str) -> Result<Option<&dyn TableLike>, TomlError> {
        Ok(self
            .get_key(dot_key)?
            .and_then(Item::as_table_like))
    }

    pub fn has_section(&self, dot_key: &str) -> Result<bool, TomlError> {
        Ok(self.get_section(dot_key)?.is_some())
    }

    /// Create or deep-merge a section. A non-table value at the same key is
    /// replaced.
    pub fn set_section(
        &mut self,
        dot_key: &str,
        data: &dyn TableLike,
        overwrite: bool,
    ) -> Result<(), TomlError> {
        let (path, key) = Self::resolve(dot_key)?;
        let parent = self
            .navigate_mut(&path, true)
            .ok_or_else(|| TomlError::InvalidPath(dot_key.to_string()))?;

        if !parent.get(&key).is_some_and(Item::is_table_like) {
            parent.insert(&key, Item::Table(Table::new()));
        }
        let section = parent
            .get_mut(&key)
            .and_then(Item::as_table_like_mut)
            .ok_or_else(|| TomlError::InvalidPath(dot_key.to_string()))?;
        merge_toml(section, data, overwrite);
        Ok(())
    }

    pub fn delete_section(&mut self, dot_key: &str) -> Result<bool, TomlError> {
        if !self.has_section(dot_key)? {
            return Ok(false);
        }
        self.delete_key(dot_key)
    }

    /// Keys directly under `dot_prefix`, or the top-level keys for an empty prefix
    pub fn keys(&self, dot_prefix: &str) -> Result<Vec<String>, TomlError> {
        let path = if dot_prefix.is_empty() {
            Vec::new()
        } else {
            let (mut path, leaf) = Self::resolve(dot_prefix)?;
            path.push(leaf);
            path
        };

        Ok(self
            .navigate(&path)
            .map(|table| table.iter().map(|(k, _)| k.to_string()).collect())
            .unwrap_or_default())
    }

    /// Dotted paths of every table in the document, parents before children
    pub fn table_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_table_paths(self.document.as_table(), &[], &mut paths);
        paths
    }

    /// Snapshot of the document as plain TOML data
    pub fn to_table(&self) -> Result<toml::Table, TomlError> {
        toml::from_str(&self.document.to_string()).map_err(|e| TomlError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    pub fn render(&self) -> String {
        let mut text = self.document.to_string();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        text
    }

    /// Write the document back, creating parent directories
    pub fn save(&self) -> Result<(), TomlError> {
        let io_error = |e: std::io::Error| TomlError::Io {
            path: self.path.clone(),
            message: e.to_string(),
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(&self.path, self.render()).map_err(io_error)?;
        debug!(path = %self.path.display(), "Saved TOML document");
        Ok(())
    }
}

fn implicit_table() -> Table {
    let mut table = Table::new();
    table.set_implicit(true);
    table
}

fn collect_table_paths(table: &dyn TableLike, path: &[String], out: &mut Vec<String>) {
    for (key, item) in table.iter() {
        if let Some(child) = item.as_table_like() {
            out.push(join_dot_key(path, key));
            let mut child_path = path.to_vec();
            child_path.push(key.to_string());
            collect_table_paths(child, &child_path, out);
        }
    }
}

/// Deep-merge `new` into `base`.
///
/// Nested tables are merged recursively. Any other value is written only
/// when `overwrite` is set or `base` has no such key.
pub fn merge_toml(base: &mut dyn TableLike, new: &dyn TableLike, overwrite: bool) {
    for (key, item) in new.iter() {
        match item.as_table_like() {
            Some(source) => {
                if !base.get(key).is_some_and(Item::is_table_like) {
                    base.insert(key, Item::Table(Table::new()));
                }
                if let Some(target) = base.get_mut(key).and_then(Item::as_table_like_mut) {
                    merge_toml(target, source, overwrite);
                }
            }
            None => {
                if overwrite || !base.contains_key(key) {
                    base.insert(key, item.clone());
                }
            }
        }
    }
}
