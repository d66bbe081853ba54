use std::path::Path;
use std::sync::Arc;

use crate::plugins::{PluginMeta, PluginRegistry, RegistryError, ToolRunner};

/// The black formatter
pub struct BlackRunner {
    meta: PluginMeta,
}

impl BlackRunner {
    pub fn new() -> Self {
        Self {
            meta: PluginMeta::new("black", super::QUALITY_CATEGORY, super::STYLE_SCOPE)
                .with_description("The uncompromising Python code formatter"),
        }
    }
}

impl Default for BlackRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRunner for BlackRunner {
    fn meta(&self) -> &PluginMeta {
        &self.meta
    }

    fn build_command(&self, target: Option<&Path>, check_only: bool) -> Vec<String> {
        let mut cmd = vec!["black".to_string()];
        if let Some(target) = target {
            cmd.push(target.display().to_string());
        }
        if check_only {
            cmd.push("--check".to_string());
        }
        cmd
    }
}

pub fn register(registry: &mut PluginRegistry) -> Result<(), RegistryError> {
    registry.register(Arc::new(BlackRunner::new()))
}
