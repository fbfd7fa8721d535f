use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecodeError {
    /// A codebook row lacks one of the required fields.
    #[error("codebook row {row}: missing required field '{field}'")]
    MissingField { field: String, row: usize },

    /// An old value or new label is not a text, integer or boolean scalar.
    #[error("codebook row {row}: {field} value '{value}' of type {kind} cannot be used as a key")]
    UnhashableValue {
        field: String,
        row: usize,
        kind: &'static str,
        value: String,
    },

    #[error("variable '{variable}': old value '{old_value}' maps to both '{first}' and '{second}'")]
    DuplicateOldValue {
        variable: String,
        old_value: String,
        first: String,
        second: String,
    },

    #[error("variable '{variable}': label '{label}' is shared by old values '{first}' and '{second}'")]
    AmbiguousInverse {
        variable: String,
        label: String,
        first: String,
        second: String,
    },

    #[error("column '{0}' is not a variable in the recoding map")]
    VariableNotInMap(String),

    #[error("column '{0}' not found in dataset")]
    ColumnNotFound(String),

    #[error("dataframe operation failed: {0}")]
    DataFrame(String),
}

pub type Result<T> = std::result::Result<T, RecodeError>;
