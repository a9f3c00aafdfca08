//! Presentation output: labeled tables ready for a terminal or JSON.
//!
//! A [`Report`] is what the presenter hands to the front end. Each section is
//! optional and independent; an absent section is simply not rendered.

use crate::error::AnalyzerError;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::path::Path;

/// A titled table with a row-label column, like a printed data frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledTable {
    pub title: String,
    pub columns: Vec<String>,
    pub row_labels: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl LabeledTable {
    pub fn new(
        title: impl Into<String>,
        columns: Vec<String>,
        row_labels: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Self {
        Self {
            title: title.into(),
            columns,
            row_labels,
            rows,
        }
    }

    /// Cell text by position; `None` outside the table.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    fn widths(&self) -> (usize, Vec<usize>) {
        let label_width = self.row_labels.iter().map(|l| width(l)).max().unwrap_or(0);
        let widths = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| width(c))
                    .chain(std::iter::once(width(header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        (label_width, widths)
    }
}

impl fmt::Display for LabeledTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "─".repeat(width(&self.title)))?;

        let (label_width, widths) = self.widths();
        let header: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        write_line(f, "", label_width, &header, &widths)?;

        for (label, row) in self.row_labels.iter().zip(&self.rows) {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            write_line(f, label, label_width, &cells, &widths)?;
        }
        Ok(())
    }
}

fn write_line(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    label_width: usize,
    cells: &[&str],
    widths: &[usize],
) -> fmt::Result {
    let mut line = pad(label, label_width);
    for (cell, w) in cells.iter().zip(widths) {
        line.push_str("  ");
        line.push_str(&pad(cell, *w));
    }
    writeln!(f, "{}", line.trim_end())
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad(s: &str, w: usize) -> String {
    let mut out = s.to_string();
    out.extend(std::iter::repeat(' ').take(w.saturating_sub(width(s))));
    out
}

/// Everything the presenter decided to show for one analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_value_pairs: Option<LabeledTable>,
    pub tables: Vec<LabeledTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queries: Option<LabeledTable>,
}

impl Report {
    /// All rendered tables in display order.
    pub fn sections(&self) -> impl Iterator<Item = &LabeledTable> {
        self.key_value_pairs
            .iter()
            .chain(self.tables.iter())
            .chain(self.queries.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.sections().next().is_none()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, table) in self.sections().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{table}")?;
        }
        Ok(())
    }
}

/// How a report is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Aligned plain-text tables.
    #[default]
    Text,
    /// Pretty-printed JSON of the [`Report`].
    Json,
}

impl ReportFormat {
    pub fn render(self, report: &Report) -> Result<String, AnalyzerError> {
        match self {
            ReportFormat::Text => Ok(report.to_string()),
            ReportFormat::Json => serde_json::to_string_pretty(report)
                .map(|mut s| {
                    s.push('\n');
                    s
                })
                .map_err(|e| AnalyzerError::Internal(format!("serialising report: {e}"))),
        }
    }
}

/// Write `report` to `path` atomically (temp file in the same directory, then rename).
pub fn write_report(report: &Report, path: &Path, format: ReportFormat) -> Result<(), AnalyzerError> {
    let write_err = |source: std::io::Error| AnalyzerError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };
    let rendered = format.render(report)?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(rendered.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
