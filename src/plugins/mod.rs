//! Plugin registry and the runner capability shared by every tool adapter
//!
//! Tool modules do not register themselves. Each exposes a `register`
//! function that receives the registry explicitly, and start-up code calls
//! those functions in a fixed order (see [`crate::quality::register_quality_tools`]).

pub mod registry;
pub mod runner;

pub use registry::{PluginFilter, PluginMeta, PluginRegistry, RegistryError};
pub use runner::ToolRunner;

/// Plugin kind for adapters that build external commands
pub const RUNNER_KIND: &str = "runner";

/// Build a registry with every built-in tool adapter registered
pub fn default_registry() -> Result<PluginRegistry, RegistryError> {
    let mut registry = PluginRegistry::new();
    crate::quality::register_quality_tools(&mut registry)?;
    Ok(registry)
}
