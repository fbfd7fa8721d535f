//! Stages shared by the `apply`, `show` and `check` commands.
//!
//! Each stage takes already-parsed inputs so it can be driven from tests
//! without going through argument parsing.

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use recode_core::{ChainedLabel, Collision, chained_labels, compile, find_collisions};
use recode_ingest::load_codebook_csv;
use recode_model::{CodebookRow, CompileOptions, FieldNames, RecodingMap, ValueParsing};
use recode_transform::{
    AuditOptions, RecodeReport, UnexpectedValues, audit_frame, recode_columns, recode_frame,
};
use tracing::{debug, info, warn};

use crate::logging::redact_value;

/// A codebook as read from disk and as compiled.
#[derive(Debug)]
pub struct LoadedCodebook {
    pub rows: Vec<CodebookRow>,
    pub map: RecodingMap,
}

/// Read a codebook CSV and compile it.
pub fn load_codebook(
    path: &Path,
    fields: &FieldNames,
    parsing: ValueParsing,
    options: &CompileOptions,
) -> Result<LoadedCodebook> {
    let rows = load_codebook_csv(path, fields, parsing)
        .with_context(|| format!("load codebook {}", path.display()))?;
    let map = compile(&rows, options).context("compile codebook")?;
    info!(
        codebook = %path.display(),
        rows = rows.len(),
        variables = map.len(),
        entries = map.entry_count(),
        "codebook compiled"
    );
    Ok(LoadedCodebook { rows, map })
}

/// Result of recoding a dataset.
#[derive(Debug)]
pub struct ApplyOutcome {
    pub report: RecodeReport,
    /// Leftover values in recoded columns; only filled in strict mode.
    pub unexpected: Vec<UnexpectedValues>,
}

impl ApplyOutcome {
    pub fn has_errors(&self) -> bool {
        !self.unexpected.is_empty()
    }
}

/// Recode `df` in place.
///
/// With no explicit `columns` every mapped column present is recoded and
/// missing ones are skipped. With `columns`, each must exist in both the
/// map and the dataset. In strict mode the recoded columns are audited for
/// values that did not receive a label.
pub fn apply(
    df: &mut DataFrame,
    map: &RecodingMap,
    columns: &[String],
    strict: bool,
) -> Result<ApplyOutcome> {
    let report = if columns.is_empty() {
        recode_frame(df, map)
    } else {
        recode_columns(df, map, columns)
    }
    .context("recode dataset")?;

    for stats in &report.columns {
        if stats.unmatched.is_empty() {
            continue;
        }
        let sample: Vec<&str> = stats
            .unmatched
            .iter()
            .take(5)
            .map(|value| redact_value(value))
            .collect();
        debug!(
            column = %stats.column,
            distinct = stats.unmatched.len(),
            sample = ?sample,
            "values passed through unchanged"
        );
    }
    for variable in &report.skipped {
        debug!(variable = %variable, "mapped variable absent from dataset");
    }

    let unexpected = if strict {
        audit_frame(df, map, AuditOptions::new())
            .context("audit recoded dataset")?
            .into_iter()
            .filter(|finding| {
                report
                    .columns
                    .iter()
                    .any(|stats| stats.column == finding.column)
            })
            .collect()
    } else {
        Vec::new()
    };
    Ok(ApplyOutcome { report, unexpected })
}

/// Diagnostics for a codebook and, optionally, a raw dataset.
#[derive(Debug, Default)]
pub struct CheckOutcome {
    pub collisions: Vec<Collision>,
    pub chained: Vec<ChainedLabel>,
    /// Raw dataset values that are neither an old value nor a label.
    pub uncovered: Vec<UnexpectedValues>,
    /// Mapped variables the dataset does not have.
    pub missing_columns: Vec<String>,
}

impl CheckOutcome {
    /// Collisions and uncovered values are defects; chained labels and
    /// missing columns are reported but tolerated.
    pub fn has_errors(&self) -> bool {
        !self.collisions.is_empty() || !self.uncovered.is_empty()
    }
}

pub fn check(
    rows: &[CodebookRow],
    map: &RecodingMap,
    data: Option<&DataFrame>,
) -> Result<CheckOutcome> {
    let collisions = find_collisions(rows);
    for collision in &collisions {
        warn!(
            variable = %collision.variable,
            first_row = collision.first_row,
            second_row = collision.second_row,
            "conflicting codebook rows"
        );
    }
    let chained = chained_labels(map);
    let mut outcome = CheckOutcome {
        collisions,
        chained,
        ..CheckOutcome::default()
    };
    if let Some(df) = data {
        outcome.uncovered = audit_frame(df, map, AuditOptions::new().with_old_values(true))
            .context("audit dataset")?;
        outcome.missing_columns = map
            .variables()
            .filter(|variable| df.column(variable).is_err())
            .map(ToString::to_string)
            .collect();
    }
    info!(
        collisions = outcome.collisions.len(),
        chained = outcome.chained.len(),
        uncovered = outcome.uncovered.len(),
        "codebook checked"
    );
    Ok(outcome)
}
