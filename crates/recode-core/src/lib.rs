//! Codebook compilation.
//!
//! This crate turns long-format codebook rows into a [`RecodingMap`]:
//!
//! - **compiler**: [`compile`] over typed rows and [`compile_records`] over
//!   dynamically-shaped records
//! - **inverse**: flatten a map back to rows, invert a variable's mapping
//! - **validate**: duplicate and chained-label diagnostics
//!
//! [`RecodingMap`]: recode_model::RecodingMap

pub mod compiler;
pub mod inverse;
pub mod validate;

pub use compiler::{compile, compile_records, row_from_record};
pub use inverse::{invert, to_rows};
pub use validate::{ChainedLabel, Collision, chained_labels, find_collisions};
