//! Long-format codebook rows and the field names used to read them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::{CellValue, CodeValue};

/// A dynamically-shaped codebook record: field name -> raw cell.
///
/// This is the shape loaders hand over before field lookup has been
/// checked; [`CodebookRow`] is the validated form.
pub type Record = IndexMap<String, CellValue>;

/// One (variable, old value, new label) entry of a codebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodebookRow {
    /// Dataset column the rule applies to.
    pub variable: String,
    /// Free-text description; carried along but unused by compilation.
    pub description: Option<String>,
    pub old_value: CodeValue,
    pub new_label: CodeValue,
}

impl CodebookRow {
    pub fn new(
        variable: impl Into<String>,
        old_value: impl Into<CodeValue>,
        new_label: impl Into<CodeValue>,
    ) -> Self {
        Self {
            variable: variable.into(),
            description: None,
            old_value: old_value.into(),
            new_label: new_label.into(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Names of the codebook fields that hold each part of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    pub variable: String,
    /// Optional; rows without it are accepted.
    pub description: Option<String>,
    pub old_value: String,
    pub new_label: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            variable: "column_name".to_string(),
            description: Some("description".to_string()),
            old_value: "old_values".to_string(),
            new_label: "new_labels".to_string(),
        }
    }
}

impl FieldNames {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>) -> Self {
        self.variable = name.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, name: Option<String>) -> Self {
        self.description = name;
        self
    }

    #[must_use]
    pub fn with_old_value(mut self, name: impl Into<String>) -> Self {
        self.old_value = name.into();
        self
    }

    #[must_use]
    pub fn with_new_label(mut self, name: impl Into<String>) -> Self {
        self.new_label = name.into();
        self
    }

    /// The three fields every row must carry.
    pub fn required(&self) -> [&str; 3] {
        [&self.variable, &self.old_value, &self.new_label]
    }
}
