//! Options controlling codebook compilation and loading.

use serde::{Deserialize, Serialize};

/// What to do when a variable lists the same old value twice with
/// different labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// Later row wins without notice.
    #[default]
    Overwrite,
    /// Later row wins and a warning is logged.
    Warn,
    /// Compilation fails.
    Reject,
}

/// Options for compiling a codebook into a recoding map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompileOptions {
    pub duplicates: DuplicatePolicy,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject conflicting duplicates.
    pub fn strict() -> Self {
        Self {
            duplicates: DuplicatePolicy::Reject,
        }
    }

    #[must_use]
    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }
}

/// How raw text cells are typed when a codebook is read from a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValueParsing {
    /// Detect booleans, integers and floats.
    #[default]
    Infer,
    /// Keep every cell as text.
    Text,
}
