use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::runner::DisplayMode;

/// Application configuration for tidycode
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TidycodeConfig {
    /// Locations of the files tidycode manages
    pub paths: PathsConfig,
    /// Output settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PathsConfig {
    pub pyproject: PathBuf,
    pub pre_commit: PathBuf,
    pub dependabot: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct OutputConfig {
    /// Summary display mode used when `--summary-mode` is not given
    pub summary_mode: Option<DisplayMode>,
    /// Log filter used when neither TIDYCODE_LOG nor RUST_LOG is set
    pub log_level: String,
}

impl Default for TidycodeConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig {
                pyproject: PathBuf::from("pyproject.toml"),
                pre_commit: PathBuf::from(".pre-commit-config.yaml"),
                dependabot: PathBuf::from(".github/dependabot.yml"),
            },
            output: OutputConfig {
                summary_mode: None,
                log_level: "warn".to_string(),
            },
        }
    }
}

impl TidycodeConfig {
    /// Load configuration with precedence:
    /// 1. Default values
    /// 2. `tidycode.toml` in the working directory
    /// 3. Environment variables (`TIDYCODE_PATHS__PYPROJECT`, ...)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Same as [`TidycodeConfig::load`] but looks for `tidycode.toml` in `dir`
    pub fn load_from(dir: &Path) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        let file = dir.join("tidycode.toml");
        if file.exists() {
            builder = builder.add_source(File::from(file.as_path()));
        }

        builder = builder.add_source(
            Environment::with_prefix("TIDYCODE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let tidycode_config: TidycodeConfig = config.try_deserialize()?;
        Ok(tidycode_config)
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::debug!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<TidycodeConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = TidycodeConfig::load_env_file();
        TidycodeConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static TidycodeConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Per-project settings read from `[tool.tidycode]` in pyproject.toml
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct ProjectSettings {
    pub target: Option<String>,
    pub check_only: bool,
    pub verbose: bool,
    pub tools: Option<Vec<String>>,
    pub clean: CleanSettings,
}

/// `[tool.tidycode.clean]`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CleanSettings {
    pub target: Option<String>,
    pub cleanable_dirs: Vec<String>,
    pub cleanable_files: Vec<String>,
    pub patterns: Vec<String>,
    pub excludes: Vec<String>,
}

impl ProjectSettings {
    /// Extract settings from a parsed pyproject document.
    /// A missing `[tool.tidycode]` yields the defaults.
    pub fn from_document(document: &toml::Table) -> Result<Self> {
        let section = document
            .get("tool")
            .and_then(|tool| tool.get("tidycode"))
            .cloned();

        match section {
            Some(value) => value
                .try_into()
                .context("Invalid [tool.tidycode] section"),
            None => Ok(Self::default()),
        }
    }

    /// Read settings from a pyproject file. A missing file yields the defaults.
    pub fn load(pyproject: &Path) -> Result<Self> {
        if !pyproject.exists() {
            tracing::debug!(
                path = %pyproject.display(),
                "No pyproject.toml, using default settings"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(pyproject)
            .with_context(|| format!("Failed to read {}", pyproject.display()))?;
        let document: toml::Table = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", pyproject.display()))?;
        Self::from_document(&document)
    }
}
