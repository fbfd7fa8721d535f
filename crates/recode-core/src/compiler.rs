//! The codebook compiler.
//!
//! A single pass over the rows groups them by variable identifier and pairs
//! each old value with its new label. Variables appear in the order they
//! are first seen; old values likewise within their variable. Rows for one
//! variable do not need to be contiguous.

use recode_model::{
    CellValue, CodeValue, CodebookRow, CompileOptions, DuplicatePolicy, FieldNames, RecodeError,
    RecodingMap, RecodingMapBuilder, Record, Result,
};
use tracing::{debug, warn};

/// Compile typed codebook rows into a [`RecodingMap`].
///
/// When a variable lists the same old value twice with different labels the
/// outcome depends on [`CompileOptions::duplicates`]: the later label wins
/// under `Overwrite` and `Warn`, and compilation fails under `Reject`. The
/// key keeps its first-seen position either way. Callers that rely on the
/// default `Overwrite` are responsible for keeping old values unique.
pub fn compile(rows: &[CodebookRow], options: &CompileOptions) -> Result<RecodingMap> {
    let mut builder = RecodingMapBuilder::new();
    for row in rows {
        let recode = builder.variable(&row.variable);
        let Some(previous) = recode.insert(row.old_value.clone(), row.new_label.clone()) else {
            continue;
        };
        if previous == row.new_label {
            continue;
        }
        match options.duplicates {
            DuplicatePolicy::Overwrite => {}
            DuplicatePolicy::Warn => warn!(
                variable = %row.variable,
                old_value = %row.old_value,
                previous = %previous,
                label = %row.new_label,
                "duplicate old value, later label wins"
            ),
            DuplicatePolicy::Reject => {
                return Err(RecodeError::DuplicateOldValue {
                    variable: row.variable.clone(),
                    old_value: row.old_value.to_string(),
                    first: previous.to_string(),
                    second: row.new_label.to_string(),
                });
            }
        }
    }
    let map = builder.build();
    debug!(
        rows = rows.len(),
        variables = map.len(),
        entries = map.entry_count(),
        "codebook compiled"
    );
    Ok(map)
}

/// Compile dynamically-shaped records, resolving fields by name.
///
/// Every record is validated before compilation starts, so a schema error
/// in the last row still fails the whole call without partial output.
pub fn compile_records(
    records: &[Record],
    fields: &FieldNames,
    options: &CompileOptions,
) -> Result<RecodingMap> {
    let rows = records
        .iter()
        .enumerate()
        .map(|(idx, record)| row_from_record(record, fields, idx + 1))
        .collect::<Result<Vec<_>>>()?;
    compile(&rows, options)
}

/// Validate one record against `fields`. `row` is 1-based, for messages.
pub fn row_from_record(record: &Record, fields: &FieldNames, row: usize) -> Result<CodebookRow> {
    let variable = match required(record, &fields.variable, row)? {
        CellValue::Null => {
            return Err(RecodeError::MissingField {
                field: fields.variable.clone(),
                row,
            });
        }
        CellValue::Text(value) => value.clone(),
        other => other.to_string(),
    };
    let description = fields
        .description
        .as_ref()
        .and_then(|name| record.get(name))
        .and_then(|cell| match cell {
            CellValue::Null => None,
            CellValue::Text(value) => Some(value.clone()),
            other => Some(other.to_string()),
        });
    let old_value = key(record, &fields.old_value, row)?;
    let new_label = key(record, &fields.new_label, row)?;
    Ok(CodebookRow {
        variable,
        description,
        old_value,
        new_label,
    })
}

fn required<'a>(record: &'a Record, field: &str, row: usize) -> Result<&'a CellValue> {
    record.get(field).ok_or_else(|| RecodeError::MissingField {
        field: field.to_string(),
        row,
    })
}

fn key(record: &Record, field: &str, row: usize) -> Result<CodeValue> {
    let cell = required(record, field, row)?.clone();
    CodeValue::try_from(cell).map_err(|cell| RecodeError::UnhashableValue {
        field: field.to_string(),
        row,
        kind: cell.kind(),
        value: cell.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, CellValue)]) -> Record {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), value.clone()))
            .collect()
    }

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    #[test]
    fn row_from_record_reads_named_fields() {
        let fields = FieldNames::default();
        let rec = record(&[
            ("column_name", text("status")),
            ("description", text("Application status")),
            ("old_values", text("A")),
            ("new_labels", text("Accepted")),
        ]);
        let row = row_from_record(&rec, &fields, 1).expect("valid row");
        assert_eq!(row.variable, "status");
        assert_eq!(row.description.as_deref(), Some("Application status"));
        assert_eq!(row.old_value, CodeValue::text("A"));
        assert_eq!(row.new_label, CodeValue::text("Accepted"));
    }

    #[test]
    fn description_is_optional() {
        let fields = FieldNames::default();
        let rec = record(&[
            ("column_name", text("gender")),
            ("old_values", CellValue::Int(1)),
            ("new_labels", text("Man")),
        ]);
        let row = row_from_record(&rec, &fields, 1).expect("valid row");
        assert!(row.description.is_none());
        assert_eq!(row.old_value, CodeValue::Int(1));
    }

    #[test]
    fn missing_field_is_a_schema_error() {
        let fields = FieldNames::default();
        let rec = record(&[("column_name", text("status")), ("old_values", text("A"))]);
        let err = row_from_record(&rec, &fields, 4).unwrap_err();
        match err {
            RecodeError::MissingField { field, row } => {
                assert_eq!(field, "new_labels");
                assert_eq!(row, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn float_old_value_is_a_type_error() {
        let fields = FieldNames::default();
        let rec = record(&[
            ("column_name", text("gpa")),
            ("old_values", CellValue::Float(3.5)),
            ("new_labels", text("High")),
        ]);
        let err = row_from_record(&rec, &fields, 2).unwrap_err();
        assert!(matches!(
            err,
            RecodeError::UnhashableValue { kind: "float", row: 2, .. }
        ));
    }

    #[test]
    fn null_new_label_is_a_type_error() {
        let fields = FieldNames::default();
        let rec = record(&[
            ("column_name", text("status")),
            ("old_values", text("A")),
            ("new_labels", CellValue::Null),
        ]);
        let err = row_from_record(&rec, &fields, 1).unwrap_err();
        assert!(matches!(err, RecodeError::UnhashableValue { kind: "null", .. }));
    }

    #[test]
    fn identical_duplicates_are_not_conflicts() {
        let rows = vec![
            CodebookRow::new("g", "M", "Man"),
            CodebookRow::new("g", "M", "Man"),
        ];
        let map = compile(&rows, &CompileOptions::strict()).expect("no conflict");
        assert_eq!(map.get("g").map(recode_model::VariableRecode::len), Some(1));
    }
}
