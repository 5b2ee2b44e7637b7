//! Wide row to monthly candidate expansion

use crate::models::{Category, SalesCandidate, WideRow};

/// Expand one wide row into twelve candidates, month `i` taken from slot `i - 1`
pub fn unpivot_row(row: &WideRow, category: Category) -> impl Iterator<Item = SalesCandidate> + '_ {
    row.month_values
        .iter()
        .enumerate()
        .map(move |(index, value)| SalesCandidate {
            year: row.year,
            month: index as u32 + 1,
            category,
            sales: *value,
        })
}

/// Expand all rows of one source file, preserving row order
pub fn unpivot_rows(rows: &[WideRow], category: Category) -> Vec<SalesCandidate> {
    rows.iter()
        .flat_map(|row| unpivot_row(row, category))
        .collect()
}
