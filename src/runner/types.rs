use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A fully built command ready to be launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub command: Vec<String>,
    pub display_name: String,
    pub cwd: Option<PathBuf>,
    pub category: Option<String>,
    pub is_tool: bool,
}

impl CommandSpec {
    pub fn new(command: Vec<String>, display_name: &str) -> Self {
        Self {
            command,
            display_name: display_name.to_string(),
            cwd: None,
            category: None,
            is_tool: true,
        }
    }

    pub fn with_cwd(mut self, cwd: Option<PathBuf>) -> Self {
        self.cwd = cwd;
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    /// Mark the command as an internal helper rather than a quality tool
    pub fn internal(mut self) -> Self {
        self.is_tool = false;
        self
    }

    pub fn program(&self) -> Option<&str> {
        self.command.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        self.command.get(1..).unwrap_or(&[])
    }

    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}

/// How a child process's output is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// The child inherits the terminal's standard streams
    Live,
    /// stdout/stderr are buffered and attached to the result
    Captured,
}

impl OutputMode {
    pub fn from_live(live: bool) -> Self {
        if live {
            OutputMode::Live
        } else {
            OutputMode::Captured
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Passed,
    Warning,
    Failed,
}

impl RunStatus {
    pub fn icon(&self) -> &'static str {
        match self {
            RunStatus::Passed => "✅",
            RunStatus::Warning => "⚠️",
            RunStatus::Failed => "❌",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RunStatus::Passed => "Passed",
            RunStatus::Warning => "Warning",
            RunStatus::Failed => "Failed",
        }
    }
}

/// Outcome of one tool invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunResult {
    pub display_name: String,
    pub category: Option<String>,
    pub status: RunStatus,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub summary: Option<String>,
    pub details: Option<String>,
    pub is_tool: bool,
    pub duration_ms: u64,
}

impl RunResult {
    /// Result for a step that did not come from a child process
    pub fn task(display_name: &str, category: &str, status: RunStatus, summary: String) -> Self {
        Self {
            display_name: display_name.to_string(),
            category: Some(category.to_string()),
            status,
            exit_code: if status == RunStatus::Failed { 1 } else { 0 },
            stdout: String::new(),
            stderr: String::new(),
            summary: Some(summary),
            details: None,
            is_tool: true,
            duration_ms: 0,
        }
    }

    /// Status text as shown in summaries, e.g. `✅ Passed` or `Exit 2`
    pub fn status_text(&self) -> String {
        if self.is_tool {
            format!("{} {}", self.status.icon(), self.status.label())
        } else {
            format!("Exit {}", self.exit_code)
        }
    }
}

/// Display modes for the run summary
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    /// Table with category, summary and captured output
    TableFull,
    /// Table with tool, status and summary only
    TableMinimal,
    /// One line per tool
    Text,
    /// Per-tool blocks including captured output
    List,
    /// Machine-readable JSON
    Json,
}

impl DisplayMode {
    /// Default mode when none was requested
    pub fn default_for(mode: OutputMode) -> Self {
        match mode {
            OutputMode::Live => DisplayMode::TableMinimal,
            OutputMode::Captured => DisplayMode::TableFull,
        }
    }
}

/// Ordered results of a batch run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub results: Vec<RunResult>,
}

impl RunReport {
    pub fn new(results: Vec<RunResult>) -> Self {
        Self { results }
    }

    fn count(&self, status: RunStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn passed(&self) -> usize {
        self.count(RunStatus::Passed)
    }

    pub fn warnings(&self) -> usize {
        self.count(RunStatus::Warning)
    }

    pub fn failed(&self) -> usize {
        self.count(RunStatus::Failed)
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_spec_program_and_args() {
        let spec = CommandSpec::new(
            vec!["ruff".to_string(), "check".to_string(), ".".to_string()],
            "ruff",
        );
        assert_eq!(spec.program(), Some("ruff"));
        assert_eq!(spec.args(), &["check".to_string(), ".".to_string()]);
        assert_eq!(spec.command_line(), "ruff check .");

        let empty = CommandSpec::new(vec![], "nothing");
        assert_eq!(empty.program(), None);
        assert!(empty.args().is_empty());
    }

    #[test]
    fn test_status_text_for_internal_commands() {
        let mut result = RunResult::task("step", "internal", RunStatus::Failed, "boom".into());
        assert_eq!(result.status_text(), "❌ Failed");

        result.is_tool = false;
        result.exit_code = 2;
        assert_eq!(result.status_text(), "Exit 2");
    }

    #[test]
    fn test_report_counts() {
        let report = RunReport::new(vec![
            RunResult::task("a", "quality", RunStatus::Passed, String::new()),
            RunResult::task("b", "quality", RunStatus::Failed, String::new()),
            RunResult::task("c", "quality", RunStatus::Warning, String::new()),
            RunResult::task("d", "quality", RunStatus::Passed, String::new()),
        ]);
        assert_eq!(report.passed(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.warnings(), 1);
        assert!(!report.all_passed());
    }

    #[test]
    fn test_default_display_mode_follows_output_mode() {
        assert_eq!(
            DisplayMode::default_for(OutputMode::Live),
            DisplayMode::TableMinimal
        );
        assert_eq!(
            DisplayMode::default_for(OutputMode::Captured),
            DisplayMode::TableFull
        );
    }
}
