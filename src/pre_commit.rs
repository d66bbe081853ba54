//! Editing `.pre-commit-config.yaml`

use serde_yaml::{Mapping, Sequence, Value};
use std::path::Path;
use tracing::debug;

use crate::documents::{YamlError, YamlFileManager};

pub const DEFAULT_REV: &str = "v1.0.0";
pub const MISSING_REPO: &str = "MISSING_REPO";

/// Manager for a pre-commit config. The `repos` list is normalized on load,
/// so every entry is a mapping with `repo`, `rev` and a `hooks` list.
#[derive(Debug, Clone)]
pub struct PreCommitManager {
    yaml: YamlFileManager,
    default_rev: String,
}

impl PreCommitManager {
    pub fn load(path: impl AsRef<Path>, default_rev: &str) -> Result<Self, YamlError> {
        Ok(Self::from_yaml(YamlFileManager::load(path)?, default_rev))
    }

    pub fn from_yaml(yaml: YamlFileManager, default_rev: &str) -> Self {
        let mut manager = Self {
            yaml,
            default_rev: default_rev.to_string(),
        };
        manager.normalize();
        manager
    }

    /// Rewrite every `repos` entry into `{repo, rev, hooks}`.
    ///
    /// A bare string becomes the repo URL with the default rev and no hooks.
    /// A `hooks` value that is not a list is wrapped in one. Entries that are
    /// neither strings nor mappings are dropped.
    pub fn normalize(&mut self) {
        let default_rev = Value::String(self.default_rev.clone());
        let Some(root) = self.yaml.document_mut().as_mapping_mut() else {
            return;
        };

        let repos = match root.get("repos") {
            Some(Value::Sequence(repos)) => repos.clone(),
            _ => Sequence::new(),
        };

        let normalized: Sequence = repos
            .into_iter()
            .filter_map(|entry| match entry {
                Value::String(url) => Some(repo_entry(
                    Value::String(url),
                    default_rev.clone(),
                    Sequence::new(),
                )),
                Value::Mapping(map) => {
                    let hooks = match map.get("hooks") {
                        Some(Value::Sequence(hooks)) => hooks.clone(),
                        Some(Value::Null) | None => Sequence::new(),
                        Some(other) => vec![other.clone()],
                    };
                    let mut entry = repo_entry(
                        map.get("repo")
                            .cloned()
                            .unwrap_or_else(|| Value::String(MISSING_REPO.to_string())),
                        map.get("rev").cloned().unwrap_or_else(|| default_rev.clone()),
                        hooks,
                    );
                    // Keep any other keys the user had on the entry
                    if let Value::Mapping(target) = &mut entry {
                        for (key, value) in map {
                            if !target.contains_key(&key) {
                                target.insert(key, value);
                            }
                        }
                    }
                    Some(entry)
                }
                other => {
                    debug!(entry = ?other, "Dropping malformed pre-commit repo entry");
                    None
                }
            })
            .collect();

        root.insert(Value::String("repos".to_string()), Value::Sequence(normalized));
    }

    fn repos(&self) -> &[Value] {
        self.yaml
            .document()
            .get("repos")
            .and_then(Value::as_sequence)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn repos_mut(&mut self) -> Option<&mut Sequence> {
        self.yaml
            .document_mut()
            .get_mut("repos")
            .and_then(Value::as_sequence_mut)
    }

    /// Hook ids in file order
    pub fn list_hooks(&self) -> Vec<String> {
        self.repos()
            .iter()
            .filter_map(|repo| repo.get("hooks").and_then(Value::as_sequence))
            .flatten()
            .filter_map(hook_id)
            .map(str::to_string)
            .collect()
    }

    /// Add hooks to `repo`, creating the repo entry if needed. Ids already
    /// present on that repo are skipped. Returns the number of hooks added.
    pub fn add_hooks(&mut self, repo: &str, rev: &str, hook_ids: &[String]) -> usize {
        let new_hooks: Vec<Value> = hook_ids.iter().map(|id| hook(id)).collect();

        if self.repos_mut().is_none() {
            if let Some(root) = self.yaml.document_mut().as_mapping_mut() {
                root.insert(Value::String("repos".to_string()), Value::Sequence(Vec::new()));
            }
        }
        let Some(repos) = self.repos_mut() else {
            return 0;
        };

        let existing = repos
            .iter_mut()
            .find(|entry| entry.get("repo").and_then(Value::as_str) == Some(repo));

        match existing.and_then(|entry| entry.get_mut("hooks")).and_then(Value::as_sequence_mut) {
            Some(hooks) => {
                let mut added = 0;
                for new_hook in new_hooks {
                    let id = hook_id(&new_hook);
                    if !hooks.iter().any(|h| hook_id(h) == id) {
                        hooks.push(new_hook);
                        added += 1;
                    }
                }
                added
            }
            None => {
                let mut unique: Sequence = Vec::new();
                for new_hook in new_hooks {
                    if !unique.iter().any(|h| hook_id(h) == hook_id(&new_hook)) {
                        unique.push(new_hook);
                    }
                }
                let added = unique.len();
                repos.push(repo_entry(
                    Value::String(repo.to_string()),
                    Value::String(rev.to_string()),
                    unique,
                ));
                added
            }
        }
    }

    /// Remove a hook id from every repo. Returns the number of hooks removed.
    pub fn remove_hook(&mut self, id: &str) -> usize {
        let Some(repos) = self.repos_mut() else {
            return 0;
        };

        let mut removed = 0;
        for repo in repos.iter_mut() {
            if let Some(hooks) = repo.get_mut("hooks").and_then(Value::as_sequence_mut) {
                let before = hooks.len();
                hooks.retain(|h| hook_id(h) != Some(id));
                removed += before - hooks.len();
            }
        }
        removed
    }

    pub fn yaml(&self) -> &YamlFileManager {
        &self.yaml
    }

    pub fn save(&self) -> Result<(), YamlError> {
        self.yaml.save()
    }
}

fn repo_entry(repo: Value, rev: Value, hooks: Sequence) -> Value {
    let mut entry = Mapping::new();
    entry.insert(Value::String("repo".to_string()), repo);
    entry.insert(Value::String("rev".to_string()), rev);
    entry.insert(Value::String("hooks".to_string()), Value::Sequence(hooks));
    Value::Mapping(entry)
}

fn hook(id: &str) -> Value {
    let mut hook = Mapping::new();
    hook.insert(Value::String("id".to_string()), Value::String(id.to_string()));
    Value::Mapping(hook)
}

fn hook_id(hook: &Value) -> Option<&str> {
    match hook {
        Value::Mapping(_) => hook.get("id").and_then(Value::as_str),
        Value::String(id) => Some(id),
        _ => None,
    }
}
