//! Error types for codebook and dataset loading.

use std::path::PathBuf;

use recode_model::RecodeError;
use thiserror::Error;

/// Errors that can occur while loading or writing tables.
#[derive(Debug, Error)]
pub enum IngestError {
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read or write a file.
    #[error("failed to access file {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Required codebook column not found in the header row.
    #[error("required column '{column}' not found in {source_name}")]
    MissingColumn { column: String, source_name: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    /// A codebook row failed validation.
    #[error(transparent)]
    Recode(#[from] RecodeError),
}

pub type Result<T> = std::result::Result<T, IngestError>;
