//! Property tests for tool resolution and command construction

use async_trait::async_trait;
use proptest::prelude::*;
use std::sync::Mutex;

use tidycode::config::ProjectSettings;
use tidycode::plugins::{default_registry, RegistryError};
use tidycode::quality::{plan_quality_run, run_quality_tools, QualityOptions, QUALITY_CATEGORY};
use tidycode::runner::{CommandError, CommandExecutor, CommandSpec, OutputMode, ProcessOutcome};

const TOOLS: [&str; 4] = ["black", "isort", "ruff", "mypy"];

/// Records every spawn request and reports success
#[derive(Default)]
struct RecordingExecutor {
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl CommandExecutor for RecordingExecutor {
    async fn execute(
        &self,
        spec: &CommandSpec,
        _mode: OutputMode,
    ) -> Result<ProcessOutcome, CommandError> {
        self.calls.lock().unwrap().push(spec.display_name.clone());
        Ok(ProcessOutcome {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

fn tool_subset() -> impl Strategy<Value = Vec<String>> {
    proptest::sample::subsequence(TOOLS.to_vec(), 1..=TOOLS.len())
        .prop_shuffle()
        .prop_map(|names| names.into_iter().map(str::to_string).collect())
}

fn options(tools: Vec<String>, check_only: bool) -> QualityOptions {
    QualityOptions {
        tools: Some(tools),
        check_only,
        live: false,
        ..QualityOptions::default()
    }
}

proptest! {
    #[test]
    fn any_subset_resolves_in_request_order(names in tool_subset(), check_only in any::<bool>()) {
        let registry = default_registry().unwrap();
        let plan = plan_quality_run(
            &registry,
            &ProjectSettings::default(),
            &options(names.clone(), check_only),
        )
        .unwrap();

        let planned: Vec<String> = plan.specs.iter().map(|s| s.display_name.clone()).collect();
        prop_assert_eq!(planned, names);
    }

    #[test]
    fn every_requested_tool_runs_once(names in tool_subset()) {
        let registry = default_registry().unwrap();
        let executor = RecordingExecutor::default();
        let runtime = tokio::runtime::Runtime::new().unwrap();

        let report = runtime
            .block_on(run_quality_tools(
                &registry,
                &executor,
                &ProjectSettings::default(),
                &options(names.clone(), false),
            ))
            .unwrap();

        prop_assert_eq!(report.results.len(), names.len());
        prop_assert_eq!(executor.calls.lock().unwrap().clone(), names);
    }

    #[test]
    fn unknown_name_spawns_nothing(
        names in tool_subset(),
        unknown in "[a-z]{3,10}"
            .prop_filter("must not be a real tool", |n| !TOOLS.contains(&n.as_str())),
        position in any::<prop::sample::Index>(),
    ) {
        let registry = default_registry().unwrap();
        let executor = RecordingExecutor::default();
        let runtime = tokio::runtime::Runtime::new().unwrap();

        let mut requested = names;
        let at = position.index(requested.len() + 1);
        requested.insert(at, unknown.clone());

        let result = runtime.block_on(run_quality_tools(
            &registry,
            &executor,
            &ProjectSettings::default(),
            &options(requested, false),
        ));

        let err = result.unwrap_err();
        let registry_error = err.downcast_ref::<RegistryError>().unwrap();
        prop_assert!(
            matches!(
                registry_error,
                RegistryError::UnknownTool { names, .. } if names == &vec![unknown.clone()]
            ),
            "unexpected error: {:?}",
            registry_error
        );
        prop_assert!(executor.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn check_only_never_adds_mutation_flags(name in proptest::sample::select(TOOLS.to_vec())) {
        let registry = default_registry().unwrap();
        let plugin = registry.get(QUALITY_CATEGORY, name).unwrap();

        let fixing = plugin.build_command(None, false);
        let checking = plugin.build_command(None, true);

        prop_assert!(!checking.contains(&"--fix".to_string()));
        for arg in checking.iter().filter(|arg| !fixing.contains(*arg)) {
            prop_assert!(arg.starts_with("--check"), "{} added {}", name, arg);
        }
        if name == "mypy" {
            prop_assert_eq!(checking, fixing);
        }
    }
}
