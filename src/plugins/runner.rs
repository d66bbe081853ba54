use std::fmt;
use std::path::Path;

use super::registry::PluginMeta;
use crate::runner::CommandSpec;

/// Capability every quality tool adapter implements
///
/// Implementations only describe how to invoke a tool; launching it is the
/// job of [`crate::runner::CommandExecutor`].
pub trait ToolRunner: Send + Sync {
    fn meta(&self) -> &PluginMeta;

    /// Build the argv for this tool. The first element is the executable.
    fn build_command(&self, target: Option<&Path>, check_only: bool) -> Vec<String>;

    /// Whether the adapter wraps a real external executable
    fn is_tool(&self) -> bool {
        true
    }

    fn command_spec(&self, target: Option<&Path>, check_only: bool) -> CommandSpec {
        let meta = self.meta();
        let spec = CommandSpec::new(self.build_command(target, check_only), &meta.name)
            .with_category(&meta.category);
        if self.is_tool() {
            spec
        } else {
            spec.internal()
        }
    }
}

impl fmt::Debug for dyn ToolRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRunner")
            .field("meta", self.meta())
            .field("is_tool", &self.is_tool())
            .finish()
    }
}
