//! Removal of build artifacts and caches listed under `[tool.tidycode.clean]`

use anyhow::Result;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::CleanSettings;
use crate::fs::FileSystemOperations;
use crate::runner::{RunResult, RunStatus};

pub const CLEAN_CATEGORY: &str = "clean";

#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    pub dry_run: bool,
    /// Overrides `[tool.tidycode.clean].target`
    pub target: Option<PathBuf>,
    /// Overrides `[tool.tidycode.clean].excludes`
    pub excludes: Option<Vec<String>>,
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CleanKind {
    Directory,
    File,
    Pattern,
}

impl CleanKind {
    fn label(&self) -> &'static str {
        match self {
            CleanKind::Directory => "directory",
            CleanKind::File => "file",
            CleanKind::Pattern => "pattern",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CleanTotals {
    pub processed: usize,
    pub removed: usize,
    pub skipped: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SkippedItems {
    pub directories: Vec<String>,
    pub files: Vec<String>,
    pub patterns: Vec<String>,
}

impl SkippedItems {
    fn len(&self) -> usize {
        self.directories.len() + self.files.len() + self.patterns.len()
    }

    fn bucket(&mut self, kind: CleanKind) -> &mut Vec<String> {
        match kind {
            CleanKind::Directory => &mut self.directories,
            CleanKind::File => &mut self.files,
            CleanKind::Pattern => &mut self.patterns,
        }
    }
}

/// Everything a clean run did, in the shape of the JSON summary
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    #[serde(skip)]
    pub results: Vec<RunResult>,
    pub totals: CleanTotals,
    pub removed_directories: usize,
    pub removed_files: usize,
    pub dry_run: bool,
    pub excludes: Vec<String>,
    pub target: PathBuf,
    /// Relative paths of every removed (or would-be removed) item
    pub items: Vec<String>,
    pub skipped: SkippedItems,
}

impl CleanReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn finish(&mut self) {
        let removed = self.removed_directories + self.removed_files;
        let skipped = self.skipped.len();
        self.totals = CleanTotals {
            processed: removed + skipped + self.totals.errors,
            removed,
            skipped,
            errors: self.totals.errors,
        };
    }
}

/// `docs/`, `./docs` and `docs` all compare equal
fn normalize(path: &Path) -> String {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect::<PathBuf>()
        .to_string_lossy()
        .into_owned()
}

fn relative(path: &Path, base: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(rel) => normalize(rel),
        Err(_) => path.display().to_string(),
    }
}

/// True when `rel` or one of its parent directories is excluded
fn under_excluded_parent(rel: &str, excludes: &[String]) -> bool {
    Path::new(rel)
        .ancestors()
        .skip(1)
        .filter(|parent| !parent.as_os_str().is_empty())
        .any(|parent| excludes.iter().any(|e| Path::new(e) == parent))
}

/// Recursive matches of `pattern` below `target`, sorted
fn glob_matches(target: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let root = glob::Pattern::escape(&target.to_string_lossy());
    let full = format!("{root}/**/{pattern}");

    let mut matches = Vec::new();
    for entry in glob::glob(&full)? {
        match entry {
            Ok(path) => matches.push(path),
            Err(e) => warn!(pattern = %pattern, error = %e, "Unreadable path while matching"),
        }
    }
    Ok(matches)
}

struct Cleaner<'a> {
    fs_ops: &'a dyn FileSystemOperations,
    target: PathBuf,
    excludes: Vec<String>,
    dry_run: bool,
    verbose: bool,
}

impl Cleaner<'_> {
    async fn remove_all(&self, paths: Vec<PathBuf>, kind: CleanKind, report: &mut CleanReport) {
        for path in paths {
            let rel = relative(&path, &self.target);
            if self.excludes.contains(&rel) || !self.fs_ops.exists(&path) {
                debug!(path = %rel, "Skipping");
                report.skipped.bucket(kind).push(rel);
                continue;
            }

            let label = kind.label();
            let display_name = format!("Clean {label}: {rel}");
            let is_dir = self.fs_ops.is_dir(&path);

            let (status, summary, stderr) = if self.dry_run {
                if self.verbose {
                    println!("🔍 [Dry-run] Would remove {label}: {rel}");
                }
                (RunStatus::Warning, format!("Would remove {label}: {rel}"), None)
            } else {
                let removal = if is_dir {
                    self.fs_ops.remove_dir_all(&path).await
                } else {
                    self.fs_ops.remove_file(&path).await
                };
                match removal {
                    Ok(()) => {
                        info!(path = %rel, kind = label, "Removed");
                        if self.verbose {
                            println!("✅ Removed {label}: {rel}");
                        }
                        (RunStatus::Passed, format!("Removed {label}: {rel}"), None)
                    }
                    Err(e) => {
                        warn!(path = %rel, error = %e, "Failed to remove");
                        if self.verbose {
                            println!("❌ Error removing {label}: {rel}");
                        }
                        (
                            RunStatus::Failed,
                            format!("Error removing {label}: {rel}"),
                            Some(e.to_string()),
                        )
                    }
                }
            };

            match status {
                RunStatus::Failed => report.totals.errors += 1,
                _ if is_dir => report.removed_directories += 1,
                _ => report.removed_files += 1,
            }

            let mut result = RunResult::task(&display_name, CLEAN_CATEGORY, status, summary);
            result.stdout = rel.clone();
            if let Some(stderr) = stderr {
                result.stderr = stderr;
            }
            report.items.push(rel);
            report.results.push(result);
        }
    }
}

/// Remove the configured directories, then files, then pattern matches.
///
/// Paths are relative to the target directory, which defaults to `.`.
/// A failed removal is recorded and the run carries on.
pub async fn run_clean(
    fs_ops: &dyn FileSystemOperations,
    settings: &CleanSettings,
    options: &CleanOptions,
) -> Result<CleanReport> {
    let target = options
        .target
        .clone()
        .or_else(|| settings.target.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let excludes: Vec<String> = options
        .excludes
        .as_ref()
        .unwrap_or(&settings.excludes)
        .iter()
        .map(|e| normalize(Path::new(e.trim())))
        .filter(|e| !e.is_empty())
        .collect();

    info!(target = %target.display(), dry_run = options.dry_run, "Starting clean");

    let cleaner = Cleaner {
        fs_ops,
        target: target.clone(),
        excludes: excludes.clone(),
        dry_run: options.dry_run,
        verbose: options.verbose,
    };
    let mut report = CleanReport {
        dry_run: options.dry_run,
        excludes,
        target: target.clone(),
        ..CleanReport::default()
    };

    let dirs = settings.cleanable_dirs.iter().map(|d| target.join(d)).collect();
    cleaner.remove_all(dirs, CleanKind::Directory, &mut report).await;

    let files = settings.cleanable_files.iter().map(|f| target.join(f)).collect();
    cleaner.remove_all(files, CleanKind::File, &mut report).await;

    for pattern in &settings.patterns {
        let mut matched = Vec::new();
        for path in glob_matches(&target, pattern)? {
            let rel = relative(&path, &target);
            if under_excluded_parent(&rel, &cleaner.excludes) {
                report.skipped.patterns.push(rel);
            } else {
                matched.push(path);
            }
        }
        cleaner.remove_all(matched, CleanKind::Pattern, &mut report).await;
    }

    report.finish();
    Ok(report)
}
