//! Loading codebooks and datasets.
//!
//! - **codebook**: CSV or DataFrame codebooks to records and rows
//! - **dataset**: dataset CSV read/write through polars
//! - **polars_utils**: `AnyValue` to [`CellValue`] conversion
//!
//! [`CellValue`]: recode_model::CellValue

pub mod codebook;
pub mod dataset;
pub mod error;
pub mod polars_utils;

pub use codebook::{
    codebook_records_from_frame, codebook_rows_from_frame, load_codebook_csv,
    read_codebook_records,
};
pub use dataset::{read_dataset_csv, write_dataset_csv, write_dataset_to};
pub use error::{IngestError, Result};
pub use polars_utils::{any_to_cell, column_cells};
