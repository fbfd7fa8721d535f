//! Dataset CSV read/write through polars.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use polars::prelude::{CsvReadOptions, CsvWriter, DataFrame, SerReader, SerWriter};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Reads a dataset CSV into a DataFrame.
///
/// Column dtypes are inferred from the whole file, so an integer-coded
/// column arrives as `Int64` and matches integer codebook keys directly.
pub fn read_dataset_csv(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "dataset read"
    );
    Ok(df)
}

/// Writes a DataFrame as CSV (with header) to any writer.
pub fn write_dataset_to<W: Write>(df: &mut DataFrame, writer: &mut W) -> Result<()> {
    CsvWriter::new(writer)
        .include_header(true)
        .finish(df)
        .map_err(|e| IngestError::DataFrame {
            message: e.to_string(),
        })
}

/// Writes a DataFrame as CSV to `path`, replacing any existing file.
pub fn write_dataset_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|source| IngestError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    write_dataset_to(df, &mut file)?;
    debug!(path = %path.display(), rows = df.height(), "dataset written");
    Ok(())
}
