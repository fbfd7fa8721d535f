use std::path::PathBuf;

use recode_cli::pipeline::{ApplyOutcome, CheckOutcome};

#[derive(Debug)]
pub struct ApplyResult {
    pub codebook: PathBuf,
    pub data: PathBuf,
    /// `None` when writing to stdout or when output was withheld.
    pub output: Option<PathBuf>,
    pub rows: usize,
    pub outcome: ApplyOutcome,
    /// Strict mode found leftovers, so nothing was written.
    pub withheld: bool,
}

impl ApplyResult {
    pub fn has_errors(&self) -> bool {
        self.outcome.has_errors()
    }
}

#[derive(Debug)]
pub struct CheckResult {
    pub codebook: PathBuf,
    pub data: Option<PathBuf>,
    pub rows: usize,
    pub variables: usize,
    pub outcome: CheckOutcome,
}

impl CheckResult {
    pub fn has_errors(&self) -> bool {
        self.outcome.has_errors()
    }
}
