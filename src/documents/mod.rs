//! Read-modify-write managers for the configuration files tidycode edits

pub mod toml_file;
pub mod yaml_file;

pub use toml_file::{merge_toml, TomlError, TomlFileManager};
pub use yaml_file::{YamlError, YamlFileManager};

/// Split `a.b.c` into the parent path `["a", "b"]` and the leaf `c`.
///
/// Returns `None` for an empty key or one with empty segments (`a..b`).
pub fn split_dot_key(key: &str) -> Option<(Vec<String>, String)> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.trim().is_empty()) {
        return None;
    }

    let (leaf, parents) = parts.split_last()?;
    Some((
        parents.iter().map(|p| p.trim().to_string()).collect(),
        leaf.trim().to_string(),
    ))
}

/// Inverse of [`split_dot_key`]
pub fn join_dot_key(path: &[String], key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path.join("."), key)
    }
}
