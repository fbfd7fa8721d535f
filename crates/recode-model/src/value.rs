//! Scalar values carried by codebooks and datasets.
//!
//! Two types live here:
//!
//! - [`CellValue`]: whatever a codebook or dataset cell holds, including
//!   nulls and floats.
//! - [`CodeValue`]: the subset of scalars that can serve as a mapping key
//!   (text, integer, boolean). Old values and new labels are both stored as
//!   `CodeValue`.

use std::fmt;

use serde::{Serialize, Serializer};

/// A hashable scalar usable as a recoding key or label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CodeValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl CodeValue {
    /// Build a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Integer view used to bridge text and integer values.
    ///
    /// `Int(3)` and `Text("3")` share the key `3`. Text only qualifies when
    /// it is the canonical rendering of an integer, so `"03"`, `"+3"` and
    /// `"3.0"` have no key.
    pub fn numeric_key(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Text(value) => canonical_int(value),
            Self::Bool(_) => None,
        }
    }

    /// Short type name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Text(_) => "text",
        }
    }
}

impl fmt::Display for CodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl Serialize for CodeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::Text(value) => serializer.serialize_str(value),
        }
    }
}

impl From<&str> for CodeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CodeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CodeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for CodeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A raw cell value before key validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Interpret a raw text cell the way a delimited-file reader would.
    ///
    /// Empty cells become `Null`; `true`/`false` become booleans; integers
    /// and floats are parsed; everything else stays text (trimmed).
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim().trim_matches('\u{feff}');
        if trimmed.is_empty() {
            return Self::Null;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        if let Ok(value) = trimmed.parse::<i64>() {
            return Self::Int(value);
        }
        if let Ok(value) = trimmed.parse::<f64>() {
            return Self::Float(value);
        }
        Self::Text(trimmed.to_string())
    }

    /// Keep the cell as text; only empty cells become `Null`.
    pub fn text(raw: &str) -> Self {
        let trimmed = raw.trim().trim_matches('\u{feff}');
        if trimmed.is_empty() {
            Self::Null
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<CodeValue> for CellValue {
    fn from(value: CodeValue) -> Self {
        match value {
            CodeValue::Bool(value) => Self::Bool(value),
            CodeValue::Int(value) => Self::Int(value),
            CodeValue::Text(value) => Self::Text(value),
        }
    }
}

/// Floats and nulls cannot be keys; the rejected cell is handed back.
impl TryFrom<CellValue> for CodeValue {
    type Error = CellValue;

    fn try_from(value: CellValue) -> Result<Self, Self::Error> {
        match value {
            CellValue::Bool(value) => Ok(Self::Bool(value)),
            CellValue::Int(value) => Ok(Self::Int(value)),
            CellValue::Text(value) => Ok(Self::Text(value)),
            other @ (CellValue::Null | CellValue::Float(_)) => Err(other),
        }
    }
}

/// The integer `value` spells, if it spells it exactly as `i64` displays.
fn canonical_int(value: &str) -> Option<i64> {
    value
        .parse::<i64>()
        .ok()
        .filter(|parsed| parsed.to_string() == value)
}

/// Integral floats within `i64` range map onto an integer key.
pub fn float_to_key(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
        Some(value as i64)
    } else {
        None
    }
}
