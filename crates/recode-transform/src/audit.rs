//! Post-substitution audit.
//!
//! Pass-through of unknown values is deliberate, so a strict caller has to
//! look for leftovers separately. [`audit_frame`] lists, per mapped column,
//! the values that are not one of the column's labels.

use std::collections::HashSet;

use polars::prelude::DataFrame;
use recode_model::{RecodingMap, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::frame::{has_column, read_cells};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditOptions {
    /// Accept raw old values too (auditing a table before recoding).
    pub allow_old_values: bool,
}

impl AuditOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_old_values(mut self, allow: bool) -> Self {
        self.allow_old_values = allow;
        self
    }
}

/// Values found in a mapped column outside the expected set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnexpectedValues {
    pub column: String,
    /// Distinct offending values, first-seen order.
    pub values: Vec<String>,
    /// Number of offending cells.
    pub cells: usize,
}

pub fn audit_frame(
    df: &DataFrame,
    map: &RecodingMap,
    options: AuditOptions,
) -> Result<Vec<UnexpectedValues>> {
    let mut findings = Vec::new();
    for (variable, recode) in map.iter() {
        if !has_column(df, variable) {
            continue;
        }
        let mut seen = HashSet::new();
        let mut finding = UnexpectedValues {
            column: variable.to_string(),
            values: Vec::new(),
            cells: 0,
        };
        for cell in read_cells(df, variable)? {
            if cell.is_null() || recode.is_label(&cell) {
                continue;
            }
            if options.allow_old_values && recode.lookup(&cell).is_some() {
                continue;
            }
            finding.cells += 1;
            let text = cell.to_string();
            if seen.insert(text.clone()) {
                finding.values.push(text);
            }
        }
        if finding.cells > 0 {
            warn!(
                column = %finding.column,
                distinct = finding.values.len(),
                cells = finding.cells,
                "values without a codebook label"
            );
            findings.push(finding);
        }
    }
    Ok(findings)
}
