//! Table reconstruction from positioned text fragments.
//!
//! The backend flattens every detected table on every page into one list of
//! cell fragments, each carrying its own `RowIndex`/`ColumnIndex`. Row indices
//! restart per table, so the list alone does not say where one table ends.
//! Known header texts ("markers") are used as boundaries instead: each marker
//! opens a region that runs up to the next marker, and every region is pivoted
//! into a grid.

use crate::model::TableFragment;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

/// A reconstructed table keyed by the backend's own row/column indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableGrid {
    /// Distinct row indices, ascending.
    pub rows: Vec<u32>,
    /// Distinct column indices, ascending.
    pub columns: Vec<u32>,
    cells: BTreeMap<(u32, u32), String>,
}

impl TableGrid {
    /// Pivot one region into a grid, space-joining texts that share a cell.
    pub fn from_fragments(fragments: &[TableFragment]) -> Self {
        let mut cells: BTreeMap<(u32, u32), String> = BTreeMap::new();
        let mut rows = BTreeSet::new();
        let mut columns = BTreeSet::new();

        for f in fragments {
            rows.insert(f.row_index);
            columns.insert(f.column_index);
            cells
                .entry((f.row_index, f.column_index))
                .and_modify(|cell| {
                    cell.push(' ');
                    cell.push_str(&f.text);
                })
                .or_insert_with(|| f.text.clone());
        }

        Self {
            rows: rows.into_iter().collect(),
            columns: columns.into_iter().collect(),
            cells,
        }
    }

    /// Cell text; `""` where the region had no fragment.
    pub fn cell(&self, row: u32, column: u32) -> &str {
        self.cells.get(&(row, column)).map(String::as_str).unwrap_or("")
    }

    /// Rows as dense vectors, one entry per column in [`TableGrid::columns`].
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|&r| self.columns.iter().map(|&c| self.cell(r, c).to_string()).collect())
            .collect()
    }

    /// Number of populated cells.
    pub fn filled_cells(&self) -> usize {
        self.cells.len()
    }
}

/// Indices of fragments whose text is exactly one of `markers`.
pub fn find_markers(fragments: &[TableFragment], markers: &[String]) -> Vec<usize> {
    fragments
        .iter()
        .enumerate()
        .filter(|(_, f)| markers.iter().any(|m| *m == f.text))
        .map(|(i, _)| i)
        .collect()
}

/// Split `0..len` into regions that each start at a marker.
///
/// Anything before the first marker belongs to no region.
pub fn segment_ranges(marker_positions: &[usize], len: usize) -> Vec<Range<usize>> {
    marker_positions
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = marker_positions.get(i + 1).copied().unwrap_or(len);
            start..end
        })
        .collect()
}

/// Rebuild every marked table region as a [`TableGrid`], in source order.
///
/// Without markers there is no way to tell tables apart, so nothing is
/// returned.
pub fn reconstruct_tables(fragments: &[TableFragment], markers: &[String]) -> Vec<TableGrid> {
    let positions = find_markers(fragments, markers);
    segment_ranges(&positions, fragments.len())
        .into_iter()
        .map(|range| TableGrid::from_fragments(&fragments[range]))
        .collect()
}
