//! Column substitution.
//!
//! Each cell whose value is an old-value key of the column's mapping is
//! replaced by the new label. Everything else passes through untouched,
//! including nulls and values the codebook does not list. Row order and
//! row count never change.
//!
//! Two ways to drive it over a whole table:
//!
//! - [`recode_frame`] recodes every column named in the map and skips
//!   mapped variables the table does not have.
//! - [`recode_columns`] recodes an explicit column list and fails up front
//!   if any column is missing from either the map or the table.

use std::collections::HashSet;

use polars::prelude::DataFrame;
use recode_model::{CellValue, RecodeError, RecodingMap, Result, VariableRecode};
use serde::Serialize;
use tracing::{debug, info};

use crate::frame::{cells_to_series, has_column, read_cells, set_column};

/// Outcome of recoding one column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnStats {
    pub column: String,
    pub rows: usize,
    /// Cells replaced by a label.
    pub replaced: usize,
    pub nulls: usize,
    /// Distinct non-null values with no codebook entry, first-seen order.
    pub unmatched: Vec<String>,
}

impl ColumnStats {
    /// Non-null cells left as they were.
    pub fn passed_through(&self) -> usize {
        self.rows - self.replaced - self.nulls
    }
}

/// Outcome of recoding a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecodeReport {
    pub columns: Vec<ColumnStats>,
    /// Mapped variables not present in the table.
    pub skipped: Vec<String>,
}

impl RecodeReport {
    pub fn replaced(&self) -> usize {
        self.columns.iter().map(|stats| stats.replaced).sum()
    }

    pub fn has_unmatched(&self) -> bool {
        self.columns.iter().any(|stats| !stats.unmatched.is_empty())
    }
}

/// Recode one column in place.
///
/// A column with no matching cell is left exactly as it was, dtype
/// included. Otherwise it is rebuilt with a single dtype covering both the
/// labels and the passed-through values.
pub fn recode_column(
    df: &mut DataFrame,
    column: &str,
    recode: &VariableRecode,
) -> Result<ColumnStats> {
    let cells = read_cells(df, column)?;
    let mut stats = ColumnStats {
        column: column.to_string(),
        rows: cells.len(),
        ..ColumnStats::default()
    };
    let mut unmatched_seen = HashSet::new();
    let mut values = Vec::with_capacity(cells.len());
    for cell in cells {
        if cell.is_null() {
            stats.nulls += 1;
            values.push(cell);
            continue;
        }
        match recode.lookup(&cell) {
            Some(label) => {
                stats.replaced += 1;
                values.push(CellValue::from(label.clone()));
            }
            None => {
                let text = cell.to_string();
                if unmatched_seen.insert(text.clone()) {
                    stats.unmatched.push(text);
                }
                values.push(cell);
            }
        }
    }
    if stats.replaced > 0 {
        set_column(df, cells_to_series(column, &values))?;
    }
    debug!(
        column,
        rows = stats.rows,
        replaced = stats.replaced,
        unmatched = stats.unmatched.len(),
        "column recoded"
    );
    Ok(stats)
}

/// Recode every table column that is a variable of `map`.
///
/// Columns the map does not name are never touched; mapped variables the
/// table lacks are listed in [`RecodeReport::skipped`].
pub fn recode_frame(df: &mut DataFrame, map: &RecodingMap) -> Result<RecodeReport> {
    let mut report = RecodeReport::default();
    for (variable, recode) in map.iter() {
        if !has_column(df, variable) {
            debug!(variable, "mapped variable not in dataset, skipped");
            report.skipped.push(variable.to_string());
            continue;
        }
        report.columns.push(recode_column(df, variable, recode)?);
    }
    info!(
        columns = report.columns.len(),
        skipped = report.skipped.len(),
        replaced = report.replaced(),
        "dataset recoded"
    );
    Ok(report)
}

/// Recode only `columns`, in the order given.
///
/// Every column must be both a variable of `map` and a column of `df`;
/// this is checked for all of them before the first column is modified.
pub fn recode_columns<S: AsRef<str>>(
    df: &mut DataFrame,
    map: &RecodingMap,
    columns: &[S],
) -> Result<RecodeReport> {
    let mut targets = Vec::with_capacity(columns.len());
    for column in columns {
        let column = column.as_ref();
        let recode = map
            .get(column)
            .ok_or_else(|| RecodeError::VariableNotInMap(column.to_string()))?;
        if !has_column(df, column) {
            return Err(RecodeError::ColumnNotFound(column.to_string()));
        }
        targets.push((column, recode));
    }
    let mut report = RecodeReport::default();
    for (column, recode) in targets {
        report.columns.push(recode_column(df, column, recode)?);
    }
    info!(
        columns = report.columns.len(),
        replaced = report.replaced(),
        "dataset recoded"
    );
    Ok(report)
}

/// Recode a copy of `df`, leaving the input as it was.
pub fn recoded(df: &DataFrame, map: &RecodingMap) -> Result<(DataFrame, RecodeReport)> {
    let mut copy = df.clone();
    let report = recode_frame(&mut copy, map)?;
    Ok((copy, report))
}
