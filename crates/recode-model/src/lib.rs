//! Data model for codebook-driven recoding.
//!
//! - **value**: hashable [`CodeValue`] keys and raw [`CellValue`] cells
//! - **codebook**: long-format [`CodebookRow`]s and configurable [`FieldNames`]
//! - **recoding**: the compiled, insertion-ordered [`RecodingMap`]
//! - **options**: compile and load options

pub mod codebook;
pub mod error;
pub mod options;
pub mod recoding;
pub mod value;

pub use codebook::{CodebookRow, FieldNames, Record};
pub use error::{RecodeError, Result};
pub use options::{CompileOptions, DuplicatePolicy, ValueParsing};
pub use recoding::{RecodingMap, RecodingMapBuilder, VariableRecode};
pub use value::{CellValue, CodeValue};
