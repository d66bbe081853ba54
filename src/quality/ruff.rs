use std::path::Path;
use std::sync::Arc;

use crate::plugins::{PluginMeta, PluginRegistry, RegistryError, ToolRunner};

/// The ruff linter, run as `ruff check`
pub struct RuffRunner {
    meta: PluginMeta,
}

impl RuffRunner {
    pub fn new() -> Self {
        Self {
            meta: PluginMeta::new("ruff", super::QUALITY_CATEGORY, super::STYLE_SCOPE)
                .with_description("A fast Python linter, compatible with Flake8 rules"),
        }
    }
}

impl Default for RuffRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRunner for RuffRunner {
    fn meta(&self) -> &PluginMeta {
        &self.meta
    }

    fn build_command(&self, target: Option<&Path>, check_only: bool) -> Vec<String> {
        let mut cmd = vec!["ruff".to_string(), "check".to_string()];
        if let Some(target) = target {
            cmd.push(target.display().to_string());
        }
        if !check_only {
            cmd.push("--fix".to_string());
        }
        cmd
    }
}

pub fn register(registry: &mut PluginRegistry) -> Result<(), RegistryError> {
    registry.register(Arc::new(RuffRunner::new()))
}
