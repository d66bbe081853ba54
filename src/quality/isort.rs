use std::path::Path;
use std::sync::Arc;

use crate::plugins::{PluginMeta, PluginRegistry, RegistryError, ToolRunner};

/// The isort import sorter
pub struct IsortRunner {
    meta: PluginMeta,
}

impl IsortRunner {
    pub fn new() -> Self {
        Self {
            meta: PluginMeta::new("isort", super::QUALITY_CATEGORY, super::STYLE_SCOPE)
                .with_description("Python utility for sorting imports"),
        }
    }
}

impl Default for IsortRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRunner for IsortRunner {
    fn meta(&self) -> &PluginMeta {
        &self.meta
    }

    fn build_command(&self, target: Option<&Path>, check_only: bool) -> Vec<String> {
        let mut cmd = vec!["isort".to_string()];
        if let Some(target) = target {
            cmd.push(target.display().to_string());
        }
        if check_only {
            cmd.push("--check-only".to_string());
        }
        cmd
    }
}

pub fn register(registry: &mut PluginRegistry) -> Result<(), RegistryError> {
    registry.register(Arc::new(IsortRunner::new()))
}
