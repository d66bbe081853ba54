//! Differences between two configuration snapshots

use serde::Serialize;
use std::collections::BTreeSet;
use toml::{Table, Value};

use crate::table::TextTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Added,
    Removed,
    Changed,
}

impl ChangeAction {
    pub fn label(&self) -> &'static str {
        match self {
            ChangeAction::Added => "➕ Added",
            ChangeAction::Removed => "❌ Removed",
            ChangeAction::Changed => "✏️ Edited",
        }
    }

    /// Marker used in compact diff output
    pub fn marker(&self) -> char {
        match self {
            ChangeAction::Added => '+',
            ChangeAction::Removed => '-',
            ChangeAction::Changed => '~',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEntry {
    pub action: ChangeAction,
    /// Name of the changed item, e.g. `black` or `tool.black.line-length`
    pub key: String,
    /// Full dotted path of the changed item
    pub path: String,
    pub old: Option<Value>,
    pub new: Option<Value>,
}

impl ChangeEntry {
    fn new(
        action: ChangeAction,
        key: &str,
        path: String,
        old: Option<&Value>,
        new: Option<&Value>,
    ) -> Self {
        Self {
            action,
            key: key.to_string(),
            path,
            old: old.cloned(),
            new: new.cloned(),
        }
    }
}

/// Section-level diff of two pyproject snapshots.
///
/// Each table under `tool` is one unit, as is every other top-level key.
/// Entries come out sorted by path.
pub fn diff_sections(old: &Table, new: &Table) -> Vec<ChangeEntry> {
    let empty = Table::new();
    let old_tools = old.get("tool").and_then(Value::as_table).unwrap_or(&empty);
    let new_tools = new.get("tool").and_then(Value::as_table).unwrap_or(&empty);

    let mut entries = diff_keys(old_tools, new_tools, Some("tool"));

    let old_rest: Table = without_tool(old);
    let new_rest: Table = without_tool(new);
    entries.extend(diff_keys(&old_rest, &new_rest, None));

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    entries
}

fn without_tool(table: &Table) -> Table {
    table
        .iter()
        .filter(|(key, _)| key.as_str() != "tool")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn diff_keys(old: &Table, new: &Table, parent: Option<&str>) -> Vec<ChangeEntry> {
    let keys: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
    let path_of = |key: &str| match parent {
        Some(parent) => format!("{parent}.{key}"),
        None => key.to_string(),
    };

    keys.into_iter()
        .filter_map(|key| {
            let action = match (old.get(key), new.get(key)) {
                (None, Some(_)) => ChangeAction::Added,
                (Some(_), None) => ChangeAction::Removed,
                (Some(a), Some(b)) if a != b => ChangeAction::Changed,
                _ => return None,
            };
            Some(ChangeEntry::new(action, key, path_of(key), old.get(key), new.get(key)))
        })
        .collect()
}

/// Leaf-level diff of two values rooted at `prefix`.
///
/// Tables recurse by key; arrays compare element-wise and report appended
/// or dropped tails as added or removed.
pub fn diff_values(prefix: &str, old: Option<&Value>, new: Option<&Value>) -> Vec<ChangeEntry> {
    let mut entries = Vec::new();
    collect_diff(prefix, old, new, &mut entries);
    entries
}

fn collect_diff(path: &str, old: Option<&Value>, new: Option<&Value>, out: &mut Vec<ChangeEntry>) {
    let child = |key: &str| {
        if path.is_empty() {
            key.to_string()
        } else {
            format!("{path}.{key}")
        }
    };

    match (old, new) {
        (None, None) => {}
        (None, Some(_)) => out.push(ChangeEntry::new(
            ChangeAction::Added,
            path,
            path.to_string(),
            old,
            new,
        )),
        (Some(_), None) => out.push(ChangeEntry::new(
            ChangeAction::Removed,
            path,
            path.to_string(),
            old,
            new,
        )),
        (Some(Value::Table(a)), Some(Value::Table(b))) => {
            let keys: BTreeSet<&String> = a.keys().chain(b.keys()).collect();
            for key in keys {
                collect_diff(&child(key), a.get(key), b.get(key), out);
            }
        }
        (Some(Value::Array(a)), Some(Value::Array(b))) => {
            for index in 0..a.len().max(b.len()) {
                collect_diff(&format!("{path}[{index}]"), a.get(index), b.get(index), out);
            }
        }
        (Some(a), Some(b)) => {
            if a != b {
                out.push(ChangeEntry::new(ChangeAction::Changed, path, path.to_string(), old, new));
            }
        }
    }
}

/// Ordered list of changes applied to a document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChangeLog {
    entries: Vec<ChangeEntry>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<ChangeEntry>) -> Self {
        Self { entries }
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = ChangeEntry>) {
        self.entries.extend(entries);
    }

    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return "✅ No changes made.".to_string();
        }

        let mut table = TextTable::new(&["Action", "Key Path", "Old Value", "New Value"])
            .with_title("📋 Change Summary");
        for entry in &self.entries {
            table.add_row(vec![
                entry.action.label().to_string(),
                entry.path.clone(),
                display_value(entry.old.as_ref()),
                display_value(entry.new.as_ref()),
            ]);
        }
        table.render()
    }
}

fn display_value(value: Option<&Value>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(text: &str) -> Table {
        toml::from_str(text).unwrap()
    }

    #[test]
    fn test_changed_section_is_one_entry() {
        let old = table("[tool.black]\nline-length = 88\n");
        let new = table("[tool.black]\nline-length = 120\n");

        let entries = diff_sections(&old, &new);
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.action, ChangeAction::Changed);
        assert_eq!(entry.key, "black");
        assert_eq!(entry.path, "tool.black");
        assert_eq!(entry.old, Some(Value::Table(table("line-length = 88"))));
        assert_eq!(entry.new, Some(Value::Table(table("line-length = 120"))));
    }

    #[test]
    fn test_added_and_removed_sections() {
        let old = table("[project]\nname = \"a\"\n[tool.isort]\nprofile = \"black\"\n");
        let new = table("[tool.ruff]\nline-length = 88\n");

        let entries = diff_sections(&old, &new);
        let summary: Vec<(ChangeAction, &str)> = entries
            .iter()
            .map(|e| (e.action, e.path.as_str()))
            .collect();

        assert_eq!(
            summary,
            vec![
                (ChangeAction::Removed, "project"),
                (ChangeAction::Removed, "tool.isort"),
                (ChangeAction::Added, "tool.ruff"),
            ]
        );
    }

    #[test]
    fn test_identical_snapshots_have_no_changes() {
        let doc = table("[tool.black]\nline-length = 88\n");
        assert!(diff_sections(&doc, &doc).is_empty());
    }

    #[test]
    fn test_diff_values_reports_leaves() {
        let old = Value::Table(table("line-length = 88\nselect = [\"E\", \"F\"]\n"));
        let new = Value::Table(table("line-length = 100\nselect = [\"E\"]\npreview = true\n"));

        let entries = diff_values("tool.black", Some(&old), Some(&new));
        let paths: Vec<(ChangeAction, String)> =
            entries.iter().map(|e| (e.action, e.path.clone())).collect();

        assert_eq!(
            paths,
            vec![
                (ChangeAction::Changed, "tool.black.line-length".to_string()),
                (ChangeAction::Added, "tool.black.preview".to_string()),
                (ChangeAction::Removed, "tool.black.select[1]".to_string()),
            ]
        );
    }

    #[test]
    fn test_render() {
        assert_eq!(ChangeLog::new().render(), "✅ No changes made.");

        let log = ChangeLog::from_entries(diff_values(
            "tool.black",
            None,
            Some(&Value::Table(table("preview = true"))),
        ));
        let rendered = log.render();
        assert!(rendered.contains("➕ Added"));
        assert!(rendered.contains("tool.black"));
    }
}
