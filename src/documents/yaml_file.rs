use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use super::split_dot_key;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum YamlError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    #[error("IO error on {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },
    #[error("Invalid key path: '{0}'")]
    InvalidPath(String),
}

/// A YAML file addressed with dot keys. Numeric segments index sequences,
/// so `repos.0.hooks` is the hook list of the first repo.
#[derive(Debug, Clone)]
pub struct YamlFileManager {
    path: PathBuf,
    document: Value,
}

impl YamlFileManager {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, YamlError> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                YamlError::NotFound(path.clone())
            } else {
                YamlError::Io {
                    path: path.clone(),
                    message: e.to_string(),
                }
            }
        })?;
        Self::parse(path, &content)
    }

    /// An empty or comment-only document loads as an empty mapping
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self, YamlError> {
        let path = path.into();
        let document = if content.trim().is_empty() {
            Value::Mapping(Mapping::new())
        } else {
            match serde_yaml::from_str::<Value>(content) {
                Ok(Value::Null) => Value::Mapping(Mapping::new()),
                Ok(value) => value,
                Err(e) => {
                    return Err(YamlError::Parse {
                        path,
                        message: e.to_string(),
                    })
                }
            }
        };
        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Value {
        &mut self.document
    }

    fn resolve(dot_key: &str) -> Result<(Vec<String>, String), YamlError> {
        split_dot_key(dot_key).ok_or_else(|| YamlError::InvalidPath(dot_key.to_string()))
    }

    fn navigate(&self, path: &[String]) -> Option<&Value> {
        let mut current = &self.document;
        for part in path {
            current = child(current, part)?;
        }
        Some(current)
    }

    fn navigate_mut(&mut self, path: &[String], create: bool) -> Option<&mut Value> {
        let mut current = &mut self.document;
        for part in path {
            current = match current {
                Value::Mapping(map) => {
                    let key = Value::String(part.clone());
                    if !map.contains_key(&key) {
                        if !create {
                            return None;
                        }
                        map.insert(key.clone(), Value::Mapping(Mapping::new()));
                    }
                    map.get_mut(&key)?
                }
                Value::Sequence(seq) => {
                    let index: usize = part.parse().ok()?;
                    if index >= seq.len() {
                        if !create {
                            return None;
                        }
                        seq.resize(index + 1, Value::Mapping(Mapping::new()));
                    }
                    seq.get_mut(index)?
                }
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn get_key(&self, dot_key: &str) -> Result<Option<&Value>, YamlError> {
        let (path, key) = Self::resolve(dot_key)?;
        Ok(self.navigate(&path).and_then(|parent| child(parent, &key)))
    }

    pub fn has_key(&self, dot_key: &str) -> Result<bool, YamlError> {
        Ok(self.get_key(dot_key)?.is_some())
    }

    /// Set a value, creating intermediate mappings. Sequences grow with
    /// nulls up to the requested index. Returns whether anything changed.
    pub fn set_key(
        &mut self,
        dot_key: &str,
        value: Value,
        overwrite: bool,
    ) -> Result<bool, YamlError> {
        let (path, key) = Self::resolve(dot_key)?;
        let parent = self
            .navigate_mut(&path, true)
            .ok_or_else(|| YamlError::InvalidPath(dot_key.to_string()))?;

        match parent {
            Value::Mapping(map) => {
                let key = Value::String(key);
                if !overwrite && map.contains_key(&key) {
                    return Ok(false);
                }
                map.insert(key, value);
                Ok(true)
            }
            Value::Sequence(seq) => {
                let index: usize = key
                    .parse()
                    .map_err(|_| YamlError::InvalidPath(dot_key.to_string()))?;
                if index >= seq.len() {
                    seq.resize(index + 1, Value::Null);
                }
                if !overwrite && !seq[index].is_null() {
                    return Ok(false);
                }
                seq[index] = value;
                Ok(true)
            }
            _ => Err(YamlError::InvalidPath(dot_key.to_string())),
        }
    }

    pub fn delete_key(&mut self, dot_key: &str) -> Result<bool, YamlError> {
        let (path, key) = Self::resolve(dot_key)?;
        let Some(parent) = self.navigate_mut(&path, false) else {
            return Ok(false);
        };

        Ok(match parent {
            Value::Mapping(map) => map.remove(key.as_str()).is_some(),
            Value::Sequence(seq) => match key.parse::<usize>() {
                Ok(index) if index < seq.len() => {
                    seq.remove(index);
                    true
                }
                _ => false,
            },
            _ => false,
        })
    }

    pub fn render(&self) -> Result<String, YamlError> {
        serde_yaml::to_string(&self.document).map_err(|e| YamlError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    pub fn save(&self) -> Result<(), YamlError> {
        let io_error = |e: std::io::Error| YamlError::Io {
            path: self.path.clone(),
            message: e.to_string(),
        };

        let content = self.render()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(&self.path, content).map_err(io_error)?;
        debug!(path = %self.path.display(), "Saved YAML document");
        Ok(())
    }
}

fn child<'a>(value: &'a Value, part: &str) -> Option<&'a Value> {
    match value {
        Value::Mapping(map) => map.get(part),
        Value::Sequence(seq) => seq.get(part.parse::<usize>().ok()?),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
repos:
  - repo: https://github.com/psf/black
    rev: 24.4.2
    hooks:
      - id: black
"#;

    fn manager() -> YamlFileManager {
        YamlFileManager::parse(".pre-commit-config.yaml", CONFIG).unwrap()
    }

    #[test]
    fn test_get_key_through_sequences() {
        let manager = manager();
        assert_eq!(
            manager.get_key("repos.0.hooks.0.id").unwrap(),
            Some(&Value::String("black".to_string()))
        );
        assert_eq!(manager.get_key("repos.3.rev").unwrap(), None);
        assert_eq!(manager.get_key("repos.x.rev").unwrap(), None);
        assert!(manager.has_key("repos.0.rev").unwrap());
    }

    #[test]
    fn test_set_key_creates_mappings() {
        let mut manager = manager();
        manager
            .set_key("ci.autofix_prs", Value::Bool(false), true)
            .unwrap();
        assert_eq!(
            manager.get_key("ci.autofix_prs").unwrap(),
            Some(&Value::Bool(false))
        );

        assert!(!manager
            .set_key("repos.0.rev", Value::String("1.0".into()), false)
            .unwrap());
    }

    #[test]
    fn test_set_key_extends_sequences() {
        let mut manager = manager();
        manager
            .set_key("repos.0.hooks.2", Value::String("late".into()), true)
            .unwrap();

        let hooks = manager.get_key("repos.0.hooks").unwrap().unwrap();
        let hooks = hooks.as_sequence().unwrap();
        assert_eq!(hooks.len(), 3);
        assert!(hooks[1].is_null());
    }

    #[test]
    fn test_delete_key() {
        let mut manager = manager();
        assert!(manager.delete_key("repos.0.hooks.0").unwrap());
        assert!(!manager.delete_key("repos.0.hooks.0").unwrap());
        assert!(manager.delete_key("repos.0.rev").unwrap());
        assert!(!manager.delete_key("nothing.here").unwrap());
    }

    #[test]
    fn test_empty_file_is_an_empty_mapping() {
        let manager = YamlFileManager::parse("x.yaml", "# only a comment\n").unwrap();
        assert!(manager.document().as_mapping().unwrap().is_empty());
    }

    #[test]
    fn test_parse_error() {
        let err = YamlFileManager::parse("x.yaml", "repos: [unclosed").unwrap_err();
        assert!(matches!(err, YamlError::Parse { .. }));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("config.yaml");
        assert!(matches!(
            YamlFileManager::load(&path),
            Err(YamlError::NotFound(_))
        ));

        let mut manager = YamlFileManager::parse(&path, "").unwrap();
        manager
            .set_key("version", Value::Number(2.into()), true)
            .unwrap();
        manager.save().unwrap();

        let reloaded = YamlFileManager::load(&path).unwrap();
        assert_eq!(
            reloaded.get_key("version").unwrap(),
            Some(&Value::Number(2.into()))
        );
    }
}
