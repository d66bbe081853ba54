//! Plain-text tables for terminal summaries
//!
//! Widths are measured with `unicode-width` so status emoji and non-ASCII
//! tool output line up. Cells may span several lines.

use unicode_width::UnicodeWidthStr;

pub struct TextTable {
    title: Option<String>,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    row_separators: bool,
}

impl TextTable {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            title: None,
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            row_separators: false,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Draw a rule between rows, useful when cells span several lines
    pub fn with_row_separators(mut self, enabled: bool) -> Self {
        self.row_separators = enabled;
        self
    }

    pub fn add_row(&mut self, cells: Vec<String>) {
        let mut cells = cells;
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.width()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let widest = cell.lines().map(|l| l.width()).max().unwrap_or(0);
                widths[i] = widths[i].max(widest);
            }
        }
        widths
    }

    fn rule(widths: &[usize], left: &str, mid: &str, right: &str) -> String {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{left}{}{right}", segments.join(mid))
    }

    fn line(widths: &[usize], cells: &[&str]) -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.width());
                format!(" {}{} ", cell, " ".repeat(pad))
            })
            .collect();
        format!("│{}│", padded.join("│"))
    }

    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let mut out = Vec::new();

        if let Some(title) = &self.title {
            out.push(title.clone());
        }

        out.push(Self::rule(&widths, "┌", "┬", "┐"));
        let headers: Vec<&str> = self.headers.iter().map(String::as_str).collect();
        out.push(Self::line(&widths, &headers));
        out.push(Self::rule(&widths, "├", "┼", "┤"));

        for (index, row) in self.rows.iter().enumerate() {
            if index > 0 && self.row_separators {
                out.push(Self::rule(&widths, "├", "┼", "┤"));
            }
            let cell_lines: Vec<Vec<&str>> = row
                .iter()
                .map(|cell| {
                    let lines: Vec<&str> = cell.lines().collect();
                    if lines.is_empty() {
                        vec![""]
                    } else {
                        lines
                    }
                })
                .collect();
            let height = cell_lines.iter().map(Vec::len).max().unwrap_or(1);
            for line_index in 0..height {
                let cells: Vec<&str> = cell_lines
                    .iter()
                    .map(|lines| lines.get(line_index).copied().unwrap_or(""))
                    .collect();
                out.push(Self::line(&widths, &cells));
            }
        }

        out.push(Self::rule(&widths, "└", "┴", "┘"));
        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_are_aligned() {
        let mut table = TextTable::new(&["Tool", "Status"]).with_title("Summary");
        table.add_row(vec!["black".into(), "✅ Passed".into()]);
        table.add_row(vec!["mypy".into(), "❌ Failed".into()]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Summary");

        let widths: Vec<usize> = lines[1..].iter().map(|l| l.width()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{rendered}");
    }

    #[test]
    fn test_multiline_cells_expand_rows() {
        let mut table = TextTable::new(&["Tool", "Stdout"]);
        table.add_row(vec!["ruff".into(), "line one\nline two".into()]);

        let rendered = table.render();
        assert!(rendered.contains("line one"));
        assert!(rendered.contains("line two"));
        // top rule, header, rule, two content lines, bottom rule
        assert_eq!(rendered.lines().count(), 6);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = TextTable::new(&["A", "B", "C"]);
        table.add_row(vec!["only".into()]);
        assert!(table.render().contains("only"));
    }
}
