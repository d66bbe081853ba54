use anyhow::Result;
use serde::Serialize;

use super::types::{DisplayMode, RunResult};
use crate::table::TextTable;

const SUMMARY_TITLE: &str = "TidyCode Execution Summary";

#[derive(Serialize)]
struct JsonSummary<'a> {
    results: &'a [RunResult],
    passed: usize,
    warnings: usize,
    failed: usize,
}

/// Render the batch summary for the given display mode
pub fn render_summary(results: &[RunResult], mode: DisplayMode) -> Result<String> {
    let (passed, warnings, failed) = tally(results);

    let body = match mode {
        DisplayMode::TableFull => table_full(results),
        DisplayMode::TableMinimal => table_minimal(results),
        DisplayMode::Text => text_summary(results),
        DisplayMode::List => list_summary(results),
        DisplayMode::Json => {
            return Ok(serde_json::to_string_pretty(&JsonSummary {
                results,
                passed,
                warnings,
                failed,
            })?);
        }
    };

    Ok(format!(
        "{body}\n\nSummary: ✅ {passed}  ⚠️ {warnings}  ❌ {failed}"
    ))
}

pub fn print_summary(results: &[RunResult], mode: DisplayMode) -> Result<()> {
    println!();
    println!("{}", render_summary(results, mode)?);
    Ok(())
}

fn tally(results: &[RunResult]) -> (usize, usize, usize) {
    use super::types::RunStatus;

    results.iter().fold((0, 0, 0), |(p, w, f), r| match r.status {
        RunStatus::Passed => (p + 1, w, f),
        RunStatus::Warning => (p, w + 1, f),
        RunStatus::Failed => (p, w, f + 1),
    })
}

fn table_full(results: &[RunResult]) -> String {
    let mut table = TextTable::new(&["Tool", "Category", "Status", "Summary", "Stdout", "Stderr"])
        .with_title(SUMMARY_TITLE)
        .with_row_separators(true);

    for result in results {
        table.add_row(vec![
            result.display_name.clone(),
            result.category.clone().unwrap_or_default(),
            result.status_text(),
            result.summary.clone().unwrap_or_default(),
            result.stdout.clone(),
            result.stderr.clone(),
        ]);
    }
    table.render()
}

fn table_minimal(results: &[RunResult]) -> String {
    let mut table = TextTable::new(&["Tool", "Status", "Summary"]).with_title(SUMMARY_TITLE);

    for result in results {
        table.add_row(vec![
            result.display_name.clone(),
            result.status_text(),
            result.summary.clone().unwrap_or_default(),
        ]);
    }
    table.render()
}

fn text_summary(results: &[RunResult]) -> String {
    results
        .iter()
        .map(|r| {
            format!(
                "{}: {} | {}",
                r.display_name,
                r.status_text(),
                r.summary.as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn list_summary(results: &[RunResult]) -> String {
    let mut out = Vec::new();
    for result in results {
        out.push(format!("{}: {}", result.display_name, result.status_text()));
        let optional = [
            result.category.as_deref(),
            result.summary.as_deref(),
            result.details.as_deref(),
        ];
        for field in optional.into_iter().flatten() {
            out.push(format!("   {field}"));
        }
        if !result.stdout.is_empty() {
            out.push(format!("   stdout: {}", result.stdout));
        }
        if !result.stderr.is_empty() {
            out.push(format!("   stderr: {}", result.stderr));
        }
    }
    out.join("\n")
}
