use toml::Value;
use toml_edit::DocumentMut;
use tracing::info;

use crate::changelog::{diff_values, ChangeLog};
use crate::documents::{TomlError, TomlFileManager};

/// Tool sections `init` adds under `[tool]`, keyed by tool name
pub const DEFAULT_TOOLS_TOML: &str = r#"[tidycode]
target = "."
check-only = false
verbose = false
tools = ["black", "isort", "ruff", "mypy"]

[tidycode.clean]
target = "."
cleanable_dirs = [
    "__pycache__",
    ".pytest_cache",
    ".ruff_cache",
    ".mypy_cache",
    ".tox",
    "build",
    "dist",
]
cleanable_files = [".coverage", "coverage.xml"]
patterns = ["*.pyc", "*.log"]
excludes = ["docs", "migrations"]

[black]
line-length = 88
target-version = ["py310"]
skip-string-normalization = false
preview = true

[ruff]
line-length = 88
target-version = "py310"
exclude = [
    "migrations",
    ".bzr",
    ".direnv",
    ".eggs",
    ".env",
    ".git",
    ".git-rewrite",
    ".hg",
    ".ipynb_checkpoints",
    ".mypy_cache",
    ".nox",
    ".pants.d",
    ".pyenv",
    ".pytest_cache",
    ".pytype",
    ".ruff_cache",
    ".svn",
    ".tox",
    ".venv",
    ".vscode",
    "__pypackages__",
    "_build",
    "buck-out",
    "build",
    "dist",
    "env",
    "node_modules",
    "site-packages",
    "venv",
]

[ruff.lint]
select = ["E", "F", "W", "I"]
ignore = ["E501"]
fixable = ["ALL"]

[ruff.format]
quote-style = "double"
skip-magic-trailing-comma = false
line-ending = "auto"

[isort]
profile = "black"
line_length = 88
"#;

pub fn default_tools() -> Result<DocumentMut, TomlError> {
    DEFAULT_TOOLS_TOML
        .parse::<DocumentMut>()
        .map_err(|e| TomlError::Parse {
            path: "<default tools>".into(),
            message: e.to_string(),
        })
}

/// Names of the default tool sections, in insertion order
pub fn default_tool_names() -> Result<Vec<String>, TomlError> {
    Ok(default_tools()?
        .iter()
        .map(|(name, _)| name.to_string())
        .collect())
}

/// Merge the default tool sections into `manager` without touching keys
/// that are already set, and return what changed.
pub fn apply_default_tools(manager: &mut TomlFileManager) -> Result<ChangeLog, TomlError> {
    let before = manager.to_table()?;
    let defaults = default_tools()?;

    for (name, item) in defaults.iter() {
        if let Some(section) = item.as_table_like() {
            info!(tool = %name, "Loading default tool section");
            manager.set_section(&format!("tool.{name}"), section, false)?;
        }
    }

    let after = manager.to_table()?;
    Ok(ChangeLog::from_entries(diff_values(
        "",
        Some(&Value::Table(before)),
        Some(&Value::Table(after)),
    )))
}
