//! DataFrame column helpers.

use polars::prelude::{DataFrame, NamedFrom, Series};
use recode_ingest::column_cells;
use recode_model::{CellValue, RecodeError, Result};

pub(crate) fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// All cells of `name`, in row order.
pub(crate) fn read_cells(df: &DataFrame, name: &str) -> Result<Vec<CellValue>> {
    if !has_column(df, name) {
        return Err(RecodeError::ColumnNotFound(name.to_string()));
    }
    column_cells(df, name).map_err(|e| RecodeError::DataFrame(e.to_string()))
}

/// Build a series with one homogeneous dtype for `values`.
///
/// Integers stay `Int64`, booleans `Boolean`, integer/float mixes become
/// `Float64`; anything involving text becomes `String` with numbers
/// rendered as text. Nulls are kept as nulls.
pub(crate) fn cells_to_series(name: &str, values: &[CellValue]) -> Series {
    let mut ints = true;
    let mut floats = true;
    let mut bools = true;
    for value in values {
        match value {
            CellValue::Null => {}
            CellValue::Int(_) => bools = false,
            CellValue::Float(_) => {
                ints = false;
                bools = false;
            }
            CellValue::Bool(_) => {
                ints = false;
                floats = false;
            }
            CellValue::Text(_) => {
                ints = false;
                floats = false;
                bools = false;
            }
        }
    }
    if ints && !bools {
        let column: Vec<Option<i64>> = values
            .iter()
            .map(|value| match value {
                CellValue::Int(v) => Some(*v),
                _ => None,
            })
            .collect();
        return Series::new(name.into(), column);
    }
    if bools && !ints {
        let column: Vec<Option<bool>> = values
            .iter()
            .map(|value| match value {
                CellValue::Bool(v) => Some(*v),
                _ => None,
            })
            .collect();
        return Series::new(name.into(), column);
    }
    if floats && !bools {
        let column: Vec<Option<f64>> = values
            .iter()
            .map(|value| match value {
                CellValue::Int(v) => Some(*v as f64),
                CellValue::Float(v) => Some(*v),
                _ => None,
            })
            .collect();
        return Series::new(name.into(), column);
    }
    let column: Vec<Option<String>> = values
        .iter()
        .map(|value| match value {
            CellValue::Null => None,
            other => Some(other.to_string()),
        })
        .collect();
    Series::new(name.into(), column)
}

/// Replace (or add) a column.
pub(crate) fn set_column(df: &mut DataFrame, series: Series) -> Result<()> {
    df.with_column(series)
        .map_err(|e| RecodeError::DataFrame(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use polars::prelude::DataType;

    use super::*;

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    #[test]
    fn ints_stay_ints() {
        let series = cells_to_series("x", &[CellValue::Int(1), CellValue::Null]);
        assert_eq!(series.dtype(), &DataType::Int64);
        assert_eq!(series.null_count(), 1);
    }

    #[test]
    fn bools_stay_bools() {
        let series = cells_to_series("x", &[CellValue::Bool(true), CellValue::Bool(false)]);
        assert_eq!(series.dtype(), &DataType::Boolean);
    }

    #[test]
    fn int_float_mix_becomes_float() {
        let series = cells_to_series("x", &[CellValue::Int(1), CellValue::Float(2.5)]);
        assert_eq!(series.dtype(), &DataType::Float64);
    }

    #[test]
    fn text_mix_becomes_string() {
        let series = cells_to_series("x", &[text("Man"), CellValue::Int(3), CellValue::Null]);
        assert_eq!(series.dtype(), &DataType::String);
        let values = series.str().expect("string series");
        assert_eq!(values.get(0), Some("Man"));
        assert_eq!(values.get(1), Some("3"));
        assert_eq!(values.get(2), None);
    }

    #[test]
    fn all_null_column_is_typed() {
        let series = cells_to_series("x", &[CellValue::Null, CellValue::Null]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.null_count(), 2);
    }
}
