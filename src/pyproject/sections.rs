//! Non-interactive editing of pyproject sections

use toml_edit::Table;

use crate::changelog::{diff_values, ChangeEntry, ChangeLog};
use crate::documents::{split_dot_key, TomlError, TomlFileManager};

/// Where a section name is resolved: under `[tool]` or at the top level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionScope {
    #[default]
    Tool,
    Root,
}

impl SectionScope {
    pub fn from_root_flag(root: bool) -> Self {
        if root {
            SectionScope::Root
        } else {
            SectionScope::Tool
        }
    }

    /// Full dotted key for `name`, e.g. `tool.black`
    pub fn key(&self, name: &str) -> Result<String, TomlError> {
        let name = name.trim();
        if split_dot_key(name).is_none() {
            return Err(TomlError::InvalidPath(name.to_string()));
        }
        Ok(match self {
            SectionScope::Tool => format!("tool.{name}"),
            SectionScope::Root => name.to_string(),
        })
    }
}

/// Parse `key=value`. The value is read as a TOML inline value when
/// possible (`88`, `true`, `["E", "F"]`) and as a plain string otherwise.
pub fn parse_assignment(raw: &str) -> Result<(String, toml_edit::Value), TomlError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| TomlError::InvalidAssignment(raw.to_string()))?;

    let key = key.trim();
    if split_dot_key(key).is_none() {
        return Err(TomlError::InvalidAssignment(raw.to_string()));
    }
    Ok((key.to_string(), parse_value(value)))
}

pub fn parse_value(raw: &str) -> toml_edit::Value {
    let raw = raw.trim();
    match raw.parse::<toml_edit::Value>() {
        Ok(mut value) => {
            value.decor_mut().clear();
            value
        }
        Err(_) => toml_edit::Value::from(raw),
    }
}

/// Plain snapshot of the item at `dot_key`
fn snapshot(manager: &TomlFileManager, dot_key: &str) -> Result<Option<toml::Value>, TomlError> {
    let mut current = toml::Value::Table(manager.to_table()?);
    for part in dot_key.split('.') {
        match current.as_table_mut().and_then(|t| t.remove(part)) {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

/// Run `edit` against the manager and return the leaf-level changes it made
/// below `key`
fn tracked<F>(manager: &mut TomlFileManager, key: &str, edit: F) -> Result<ChangeLog, TomlError>
where
    F: FnOnce(&mut TomlFileManager) -> Result<(), TomlError>,
{
    let before = snapshot(manager, key)?;
    edit(manager)?;
    let after = snapshot(manager, key)?;
    Ok(ChangeLog::from_entries(diff_values(
        key,
        before.as_ref(),
        after.as_ref(),
    )))
}

/// Create a section or merge values into it. Existing keys are only
/// replaced with `overwrite`.
pub fn add_section(
    manager: &mut TomlFileManager,
    name: &str,
    scope: SectionScope,
    assignments: &[(String, toml_edit::Value)],
    overwrite: bool,
) -> Result<ChangeLog, TomlError> {
    let key = scope.key(name)?;
    tracked(manager, &key, |manager| {
        if !manager.has_section(&key)? {
            manager.set_section(&key, &Table::new(), false)?;
        }
        for (field, value) in assignments {
            manager.set_key(&format!("{key}.{field}"), value.clone(), overwrite)?;
        }
        Ok(())
    })
}

/// Edit an existing section
pub fn set_section(
    manager: &mut TomlFileManager,
    name: &str,
    scope: SectionScope,
    assignments: &[(String, toml_edit::Value)],
    unset: &[String],
) -> Result<ChangeLog, TomlError> {
    let key = scope.key(name)?;
    if !manager.has_section(&key)? {
        return Err(TomlError::SectionNotFound(key));
    }

    tracked(manager, &key, |manager| {
        for (field, value) in assignments {
            manager.set_key(&format!("{key}.{field}"), value.clone(), true)?;
        }
        for field in unset {
            if !manager.delete_key(&format!("{key}.{}", field.trim()))? {
                tracing::warn!(section = %key, key = %field, "Key to unset not found");
            }
        }
        Ok(())
    })
}

/// Render a section as it would appear in the file
pub fn show_section(
    manager: &TomlFileManager,
    name: &str,
    scope: SectionScope,
) -> Result<String, TomlError> {
    let key = scope.key(name)?;
    let section = snapshot(manager, &key)?
        .filter(toml::Value::is_table)
        .ok_or_else(|| TomlError::SectionNotFound(key.clone()))?;

    let mut wrapped = section;
    for part in key.rsplit('.') {
        let mut parent = toml::Table::new();
        parent.insert(part.to_string(), wrapped);
        wrapped = toml::Value::Table(parent);
    }

    toml::to_string(&wrapped).map_err(|e| TomlError::Parse {
        path: manager.path().to_path_buf(),
        message: e.to_string(),
    })
}

pub fn list_sections(manager: &TomlFileManager) -> Vec<String> {
    manager.table_paths()
}

pub fn remove_section(
    manager: &mut TomlFileManager,
    name: &str,
    scope: SectionScope,
) -> Result<ChangeLog, TomlError> {
    let key = scope.key(name)?;
    if !manager.has_section(&key)? {
        return Err(TomlError::SectionNotFound(key));
    }

    let before = snapshot(manager, &key)?;
    manager.delete_section(&key)?;
    Ok(ChangeLog::from_entries(diff_values(&key, before.as_ref(), None)))
}

/// Section-level differences between the document and what `init` would
/// produce from it
pub fn diff_with_defaults(manager: &TomlFileManager) -> Result<Vec<ChangeEntry>, TomlError> {
    let mut merged = manager.clone();
    super::apply_default_tools(&mut merged)?;
    Ok(crate::changelog::diff_sections(
        &manager.to_table()?,
        &merged.to_table()?,
    ))
}

/// One `+ [tool.black]` style line per entry
pub fn format_section_diff(entries: &[ChangeEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{} [{}]", entry.action.marker(), entry.path))
        .collect::<Vec<_>>()
        .join("\n")
}
