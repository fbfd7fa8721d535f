//! Value substitution over polars DataFrames.
//!
//! - **substitute**: recode one column, every mapped column, or an explicit
//!   column list
//! - **audit**: find values in mapped columns that are not labels after
//!   recoding
//! - **frame**: column read/write helpers

pub mod audit;
pub mod frame;
pub mod substitute;

pub use audit::{AuditOptions, UnexpectedValues, audit_frame};
pub use substitute::{
    ColumnStats, RecodeReport, recode_column, recode_columns, recode_frame, recoded,
};
