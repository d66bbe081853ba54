use std::path::Path;
use std::sync::Arc;

use crate::plugins::{PluginMeta, PluginRegistry, RegistryError, ToolRunner};

/// The mypy type checker. It never modifies files, so check-only is ignored.
pub struct MypyRunner {
    meta: PluginMeta,
}

impl MypyRunner {
    pub fn new() -> Self {
        Self {
            meta: PluginMeta::new("mypy", super::QUALITY_CATEGORY, super::TYPE_SCOPE)
                .with_description("Optional static typing for Python"),
        }
    }
}

impl Default for MypyRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRunner for MypyRunner {
    fn meta(&self) -> &PluginMeta {
        &self.meta
    }

    fn build_command(&self, target: Option<&Path>, _check_only: bool) -> Vec<String> {
        let mut cmd = vec!["mypy".to_string()];
        if let Some(target) = target {
            cmd.push(target.display().to_string());
        }
        cmd
    }
}

pub fn register(registry: &mut PluginRegistry) -> Result<(), RegistryError> {
    registry.register(Arc::new(MypyRunner::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_only_has_no_effect() {
        let runner = MypyRunner::new();
        let target = Some(Path::new("src"));
        assert_eq!(runner.build_command(target, true), vec!["mypy", "src"]);
        assert_eq!(
            runner.build_command(target, true),
            runner.build_command(target, false)
        );
    }
}
