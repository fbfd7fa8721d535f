//! Polars `AnyValue` helpers.

use polars::prelude::{AnyValue, DataFrame};
use recode_model::CellValue;

use crate::error::{IngestError, Result};

/// Converts a Polars `AnyValue` into a [`CellValue`].
///
/// Integer widths collapse to `Int`; `UInt64` values beyond `i64` and any
/// non-scalar type fall back to their text rendering.
pub fn any_to_cell(value: AnyValue<'_>) -> CellValue {
    match value {
        AnyValue::Null => CellValue::Null,
        AnyValue::Boolean(b) => CellValue::Bool(b),
        AnyValue::Int8(v) => CellValue::Int(i64::from(v)),
        AnyValue::Int16(v) => CellValue::Int(i64::from(v)),
        AnyValue::Int32(v) => CellValue::Int(i64::from(v)),
        AnyValue::Int64(v) => CellValue::Int(v),
        AnyValue::UInt8(v) => CellValue::Int(i64::from(v)),
        AnyValue::UInt16(v) => CellValue::Int(i64::from(v)),
        AnyValue::UInt32(v) => CellValue::Int(i64::from(v)),
        AnyValue::UInt64(v) => match i64::try_from(v) {
            Ok(v) => CellValue::Int(v),
            Err(_) => CellValue::Text(v.to_string()),
        },
        AnyValue::Float32(v) => CellValue::Float(f64::from(v)),
        AnyValue::Float64(v) => CellValue::Float(v),
        AnyValue::String(s) => CellValue::Text(s.to_string()),
        AnyValue::StringOwned(s) => CellValue::Text(s.to_string()),
        other => CellValue::Text(other.to_string()),
    }
}

/// Reads a whole column as cells, preserving row order.
pub fn column_cells(df: &DataFrame, name: &str) -> Result<Vec<CellValue>> {
    let column = df.column(name).map_err(|_| IngestError::MissingColumn {
        column: name.to_string(),
        source_name: "DataFrame".to_string(),
    })?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_cell(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_scalars() {
        assert_eq!(any_to_cell(AnyValue::Null), CellValue::Null);
        assert_eq!(any_to_cell(AnyValue::Int32(4)), CellValue::Int(4));
        assert_eq!(any_to_cell(AnyValue::UInt8(7)), CellValue::Int(7));
        assert_eq!(any_to_cell(AnyValue::Float64(2.5)), CellValue::Float(2.5));
        assert_eq!(any_to_cell(AnyValue::Boolean(true)), CellValue::Bool(true));
        assert_eq!(
            any_to_cell(AnyValue::String("A")),
            CellValue::Text("A".to_string())
        );
    }

    #[test]
    fn oversized_unsigned_becomes_text() {
        assert_eq!(
            any_to_cell(AnyValue::UInt64(u64::MAX)),
            CellValue::Text(u64::MAX.to_string())
        );
    }
}
