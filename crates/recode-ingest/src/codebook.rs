//! Codebook loading.
//!
//! A codebook is a long-format table with one row per (variable, old value)
//! pair. Field names are resolved against the header row
//! case-insensitively, and missing required columns are reported before any
//! row is read.

use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;
use polars::prelude::DataFrame;
use recode_core::row_from_record;
use recode_model::{CellValue, CodebookRow, FieldNames, Record, ValueParsing};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::polars_utils::column_cells;

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn build_header_map(headers: &[String]) -> BTreeMap<String, usize> {
    let mut map = BTreeMap::new();
    for (idx, header) in headers.iter().enumerate() {
        map.entry(header.to_uppercase()).or_insert(idx);
    }
    map
}

/// Map each configured field name to a header index.
///
/// Returns `(field name, index)` pairs for the required fields and the
/// description (when present in the header row).
fn resolve_fields(
    headers: &[String],
    fields: &FieldNames,
    source_name: &str,
) -> Result<Vec<(String, usize)>> {
    let header_map = build_header_map(headers);
    let mut resolved = Vec::with_capacity(4);
    for name in fields.required() {
        let idx = header_map
            .get(&name.trim().to_uppercase())
            .copied()
            .ok_or_else(|| IngestError::MissingColumn {
                column: name.to_string(),
                source_name: source_name.to_string(),
            })?;
        resolved.push((name.to_string(), idx));
    }
    if let Some(name) = &fields.description
        && let Some(idx) = header_map.get(&name.trim().to_uppercase())
    {
        resolved.push((name.clone(), *idx));
    }
    Ok(resolved)
}

fn parse_cell(raw: &str, parsing: ValueParsing) -> CellValue {
    match parsing {
        ValueParsing::Infer => CellValue::infer(raw),
        ValueParsing::Text => CellValue::text(raw),
    }
}

/// Read codebook records from a CSV file.
///
/// Blank rows are skipped. Each record carries the configured field names
/// as keys, whatever their spelling in the file's header.
pub fn read_codebook_records(
    path: &Path,
    fields: &FieldNames,
    parsing: ValueParsing,
) -> Result<Vec<Record>> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let csv_error = |error: csv::Error| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: error.to_string(),
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(normalize_header)
        .collect();
    let resolved = resolve_fields(&headers, fields, &path.display().to_string())?;

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let row: Record = resolved
            .iter()
            .map(|(name, idx)| {
                let raw = record.get(*idx).unwrap_or("");
                (name.clone(), parse_cell(raw, parsing))
            })
            .collect();
        records.push(row);
    }
    debug!(
        path = %path.display(),
        records = records.len(),
        "codebook records read"
    );
    Ok(records)
}

/// Read and validate a CSV codebook into typed rows.
pub fn load_codebook_csv(
    path: &Path,
    fields: &FieldNames,
    parsing: ValueParsing,
) -> Result<Vec<CodebookRow>> {
    let records = read_codebook_records(path, fields, parsing)?;
    let rows = records
        .iter()
        .enumerate()
        .map(|(idx, record)| row_from_record(record, fields, idx + 1))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Read codebook records out of an already-loaded DataFrame.
///
/// Cells keep the column's dtype: an integer old-value column yields
/// integer keys.
pub fn codebook_records_from_frame(df: &DataFrame, fields: &FieldNames) -> Result<Vec<Record>> {
    let headers: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(ToString::to_string)
        .collect();
    let resolved = resolve_fields(&headers, fields, "DataFrame")?;
    let mut columns = Vec::with_capacity(resolved.len());
    for (name, idx) in &resolved {
        columns.push((name.clone(), column_cells(df, &headers[*idx])?));
    }
    let records = (0..df.height())
        .map(|row| {
            columns
                .iter()
                .map(|(name, cells)| (name.clone(), cells[row].clone()))
                .collect::<Record>()
        })
        .collect();
    Ok(records)
}

/// Validate a DataFrame codebook into typed rows.
pub fn codebook_rows_from_frame(df: &DataFrame, fields: &FieldNames) -> Result<Vec<CodebookRow>> {
    let records = codebook_records_from_frame(df, fields)?;
    let rows = records
        .iter()
        .enumerate()
        .map(|(idx, record)| row_from_record(record, fields, idx + 1))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_header_strips_bom_and_spaces() {
        assert_eq!(normalize_header("\u{feff} column_name "), "column_name");
        assert_eq!(normalize_header("old   values"), "old values");
    }

    #[test]
    fn resolve_fields_is_case_insensitive() {
        let headers = vec![
            "Column_Name".to_string(),
            "Description".to_string(),
            "OLD_VALUES".to_string(),
            "new_labels".to_string(),
        ];
        let resolved = resolve_fields(&headers, &FieldNames::default(), "test").expect("resolve");
        assert_eq!(
            resolved,
            vec![
                ("column_name".to_string(), 0),
                ("old_values".to_string(), 2),
                ("new_labels".to_string(), 3),
                ("description".to_string(), 1),
            ]
        );
    }

    #[test]
    fn resolve_fields_reports_missing_column() {
        let headers = vec!["column_name".to_string(), "old_values".to_string()];
        let err = resolve_fields(&headers, &FieldNames::default(), "codebook.csv").unwrap_err();
        assert_eq!(
            err.to_string(),
            "required column 'new_labels' not found in codebook.csv"
        );
    }
}
