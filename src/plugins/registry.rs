use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use super::runner::ToolRunner;

/// Descriptor attached to every registered plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginMeta {
    pub name: String,
    pub description: String,
    pub kind: String,
    pub category: String,
    pub scope: String,
}

impl PluginMeta {
    pub fn new(name: &str, category: &str, scope: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            kind: super::RUNNER_KIND.to_string(),
            category: category.to_string(),
            scope: scope.to_string(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_kind(mut self, kind: &str) -> Self {
        self.kind = kind.to_string();
        self
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown tool(s) in category '{category}': {}", .names.join(", "))]
    UnknownTool {
        category: String,
        names: Vec<String>,
    },
    #[error("Plugin '{name}' is already registered in category '{category}'")]
    DuplicatePlugin { category: String, name: String },
}

/// Criteria for [`PluginRegistry::filter`]; `None` fields match anything
#[derive(Debug, Clone, Default)]
pub struct PluginFilter {
    pub kind: Option<String>,
    pub category: Option<String>,
    pub scope: Option<String>,
}

impl PluginFilter {
    pub fn category(category: &str) -> Self {
        Self {
            category: Some(category.to_string()),
            ..Self::default()
        }
    }

    pub fn with_scope(mut self, scope: &str) -> Self {
        self.scope = Some(scope.to_string());
        self
    }

    pub fn with_kind(mut self, kind: &str) -> Self {
        self.kind = Some(kind.to_string());
        self
    }

    fn matches(&self, meta: &PluginMeta) -> bool {
        self.kind.as_deref().map_or(true, |k| meta.kind == k)
            && self.category.as_deref().map_or(true, |c| meta.category == c)
            && self.scope.as_deref().map_or(true, |s| meta.scope == s)
    }
}

/// Registry of tool adapters, kept in registration order
#[derive(Default, Clone)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn ToolRunner>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin. A second plugin with the same name in the same
    /// category is rejected and the registry is left unchanged.
    pub fn register(&mut self, plugin: Arc<dyn ToolRunner>) -> Result<(), RegistryError> {
        let meta = plugin.meta();
        if self.get(&meta.category, &meta.name).is_some() {
            return Err(RegistryError::DuplicatePlugin {
                category: meta.category.clone(),
                name: meta.name.clone(),
            });
        }

        debug!(
            plugin = %meta.name,
            category = %meta.category,
            scope = %meta.scope,
            "Registered plugin"
        );
        self.plugins.push(plugin);
        Ok(())
    }

    pub fn get(&self, category: &str, name: &str) -> Option<Arc<dyn ToolRunner>> {
        self.plugins
            .iter()
            .find(|p| p.meta().category == category && p.meta().name == name)
            .cloned()
    }

    pub fn all(&self) -> Vec<Arc<dyn ToolRunner>> {
        self.plugins.clone()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn by_category(&self, category: &str) -> Vec<Arc<dyn ToolRunner>> {
        self.filter(&PluginFilter::category(category))
    }

    pub fn by_scope(&self, scope: &str) -> Vec<Arc<dyn ToolRunner>> {
        self.filter(&PluginFilter::default().with_scope(scope))
    }

    pub fn by_kind(&self, kind: &str) -> Vec<Arc<dyn ToolRunner>> {
        self.filter(&PluginFilter::default().with_kind(kind))
    }

    pub fn filter(&self, filter: &PluginFilter) -> Vec<Arc<dyn ToolRunner>> {
        self.plugins
            .iter()
            .filter(|p| filter.matches(p.meta()))
            .cloned()
            .collect()
    }

    /// Names registered under `category`, in registration order
    pub fn names(&self, category: &str) -> Vec<String> {
        self.by_category(category)
            .iter()
            .map(|p| p.meta().name.clone())
            .collect()
    }

    /// Resolve requested names to plugins, preserving request order.
    ///
    /// Every unknown name is collected into a single error so the caller can
    /// report them all before anything runs.
    pub fn resolve(
        &self,
        category: &str,
        names: &[String],
    ) -> Result<Vec<Arc<dyn ToolRunner>>, RegistryError> {
        let mut resolved = Vec::with_capacity(names.len());
        let mut unknown = Vec::new();

        for name in names {
            match self.get(category, name) {
                Some(plugin) => resolved.push(plugin),
                None => unknown.push(name.clone()),
            }
        }

        if !unknown.is_empty() {
            return Err(RegistryError::UnknownTool {
                category: category.to_string(),
                names: unknown,
            });
        }

        Ok(resolved)
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.plugins.iter().map(|p| p.meta()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    struct EchoRunner {
        meta: PluginMeta,
    }

    impl EchoRunner {
        fn new(name: &str, category: &str, scope: &str) -> Arc<dyn ToolRunner> {
            Arc::new(Self {
                meta: PluginMeta::new(name, category, scope),
            })
        }
    }

    impl ToolRunner for EchoRunner {
        fn meta(&self) -> &PluginMeta {
            &self.meta
        }

        fn build_command(&self, _target: Option<&Path>, _check_only: bool) -> Vec<String> {
            vec!["echo".to_string(), self.meta.name.clone()]
        }
    }

    fn sample_registry() -> PluginRegistry {
        let mut registry = PluginRegistry::new();
        registry.register(EchoRunner::new("b", "quality", "style")).unwrap();
        registry.register(EchoRunner::new("a", "quality", "type")).unwrap();
        registry.register(EchoRunner::new("c", "security", "audit")).unwrap();
        registry
    }

    fn names(plugins: &[Arc<dyn ToolRunner>]) -> Vec<String> {
        plugins.iter().map(|p| p.meta().name.clone()).collect()
    }

    #[test]
    fn test_by_category_keeps_registration_order() {
        let registry = sample_registry();
        assert_eq!(names(&registry.by_category("quality")), vec!["b", "a"]);
        assert_eq!(names(&registry.by_category("security")), vec!["c"]);
        assert!(registry.by_category("missing").is_empty());
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = sample_registry();
        let err = registry
            .register(EchoRunner::new("a", "quality", "style"))
            .unwrap_err();

        assert_eq!(
            err,
            RegistryError::DuplicatePlugin {
                category: "quality".to_string(),
                name: "a".to_string()
            }
        );
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_same_name_in_other_category_is_allowed() {
        let mut registry = sample_registry();
        registry
            .register(EchoRunner::new("a", "security", "audit"))
            .unwrap();
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_filter_combines_criteria() {
        let registry = sample_registry();
        let filter = PluginFilter::category("quality").with_scope("type");
        assert_eq!(names(&registry.filter(&filter)), vec!["a"]);
        assert_eq!(names(&registry.by_scope("style")), vec!["b"]);
        assert_eq!(registry.by_kind(crate::plugins::RUNNER_KIND).len(), 3);
    }

    #[test]
    fn test_resolve_preserves_request_order() {
        let registry = sample_registry();
        let resolved = registry
            .resolve("quality", &["a".to_string(), "b".to_string(), "a".to_string()])
            .unwrap();
        assert_eq!(names(&resolved), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_resolve_reports_every_unknown_name() {
        let registry = sample_registry();
        let err = registry
            .resolve(
                "quality",
                &["a".to_string(), "c".to_string(), "nope".to_string()],
            )
            .unwrap_err();

        match &err {
            RegistryError::UnknownTool { category, names } => {
                assert_eq!(category, "quality");
                assert_eq!(names, &vec!["c".to_string(), "nope".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("c, nope"));
    }

    #[test]
    fn test_resolved_plugins_debug_print_their_meta() {
        let registry = sample_registry();
        let resolved = registry.resolve("quality", &["b".to_string()]).unwrap();

        let printed = format!("{resolved:?}");
        assert!(printed.contains("ToolRunner"));
        assert!(printed.contains("\"b\""));
    }
}
