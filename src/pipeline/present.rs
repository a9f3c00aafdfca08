//! Result presentation: [`AnalysisResult`] → [`Report`].
//!
//! Key-value pairs and query answers arrive as lists of flat JSON records and
//! are shown one column per key, in first-seen key order, with the record's
//! position as row label. Table fragments go through the reconstructor and
//! each grid is shown with its source row/column indices as labels.

use crate::model::{AnalysisResult, Record};
use crate::pipeline::tables::{reconstruct_tables, TableGrid};
use crate::report::{LabeledTable, Report};
use serde_json::Value;
use tracing::debug;

pub const KEY_VALUE_TITLE: &str = "Key-Value Pairs";
pub const QUERIES_TITLE: &str = "Queries";

/// Build the report for one analysis. Empty sections are left out.
pub fn present(result: &AnalysisResult, markers: &[String]) -> Report {
    let key_value_pairs = records_table(KEY_VALUE_TITLE, &result.key_value_pairs);

    let grids = reconstruct_tables(&result.tables, markers);
    debug!(
        "Reconstructed {} tables from {} fragments",
        grids.len(),
        result.tables.len()
    );
    let tables = grids
        .iter()
        .enumerate()
        .map(|(i, grid)| grid_table(format!("Table {}", i + 1), grid))
        .collect();

    let queries = records_table(QUERIES_TITLE, &result.queries);

    Report {
        key_value_pairs,
        tables,
        queries,
    }
}

/// Lay out records one column per distinct key; `None` when there are none.
pub fn records_table(title: &str, records: &[Record]) -> Option<LabeledTable> {
    if records.is_empty() {
        return None;
    }

    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|c| record.get(c).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect();
    let row_labels = (0..records.len()).map(|i| i.to_string()).collect();

    Some(LabeledTable::new(title, columns, row_labels, rows))
}

fn grid_table(title: String, grid: &TableGrid) -> LabeledTable {
    LabeledTable::new(
        title,
        grid.columns.iter().map(u32::to_string).collect(),
        grid.rows.iter().map(u32::to_string).collect(),
        grid.to_rows(),
    )
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
