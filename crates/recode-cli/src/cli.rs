//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use recode_model::{DuplicatePolicy, FieldNames, ValueParsing};

#[derive(Parser)]
#[command(
    name = "recode",
    version,
    about = "Recode categorical columns of a CSV dataset from a long-format codebook",
    long_about = "Recode categorical columns of a CSV dataset from a long-format codebook.\n\n\
                  The codebook lists one (variable, old value, new label) rule per row.\n\
                  Rules are grouped per variable and applied to the dataset column of\n\
                  the same name; values without a rule are left unchanged."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow dataset values to appear in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Recode a dataset and write the result as CSV.
    Apply(ApplyArgs),

    /// Print the compiled recoding map.
    Show(ShowArgs),

    /// Report codebook defects and, given a dataset, values without a rule.
    Check(CheckArgs),
}

/// Codebook location and how to read it.
#[derive(Args, Clone)]
pub struct CodebookArgs {
    /// Path to the long-format codebook CSV.
    #[arg(value_name = "CODEBOOK")]
    pub codebook: PathBuf,

    /// Codebook column holding the dataset variable name.
    #[arg(long = "variable-field", default_value = "column_name")]
    pub variable_field: String,

    /// Codebook column holding the old (raw) value.
    #[arg(long = "old-value-field", default_value = "old_values")]
    pub old_value_field: String,

    /// Codebook column holding the new label.
    #[arg(long = "new-label-field", default_value = "new_labels")]
    pub new_label_field: String,

    /// Keep codebook values as text instead of detecting integers and booleans.
    #[arg(long = "text-values")]
    pub text_values: bool,
}

impl CodebookArgs {
    pub fn field_names(&self) -> FieldNames {
        FieldNames::new()
            .with_variable(&self.variable_field)
            .with_old_value(&self.old_value_field)
            .with_new_label(&self.new_label_field)
    }

    pub fn value_parsing(&self) -> ValueParsing {
        if self.text_values {
            ValueParsing::Text
        } else {
            ValueParsing::Infer
        }
    }
}

#[derive(Args)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub codebook: CodebookArgs,

    /// Path to the dataset CSV.
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Output CSV path (default: stdout).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Recode only these columns; each must be in the codebook and the dataset.
    #[arg(long = "columns", value_delimiter = ',', value_name = "COLUMN")]
    pub columns: Vec<String>,

    /// Fail when a recoded column still holds values without a label.
    #[arg(long = "strict")]
    pub strict: bool,

    /// What to do when a variable lists the same old value twice.
    #[arg(long = "on-duplicate", value_enum, default_value = "overwrite")]
    pub on_duplicate: DuplicateArg,
}

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub codebook: CodebookArgs,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ShowFormatArg,

    /// What to do when a variable lists the same old value twice.
    #[arg(long = "on-duplicate", value_enum, default_value = "overwrite")]
    pub on_duplicate: DuplicateArg,
}

// No duplicate policy: check compiles with overwrite so that every conflict
// can be listed.
#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub codebook: CodebookArgs,

    /// Optional dataset to check against the codebook.
    #[arg(value_name = "DATA")]
    pub data: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DuplicateArg {
    Overwrite,
    Warn,
    Reject,
}

impl From<DuplicateArg> for DuplicatePolicy {
    fn from(value: DuplicateArg) -> Self {
        match value {
            DuplicateArg::Overwrite => Self::Overwrite,
            DuplicateArg::Warn => Self::Warn,
            DuplicateArg::Reject => Self::Reject,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ShowFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn apply_parses_column_list_and_overrides() {
        let cli = Cli::try_parse_from([
            "recode",
            "apply",
            "codebook.csv",
            "data.csv",
            "--columns",
            "status,gender",
            "--variable-field",
            "var",
            "--on-duplicate",
            "reject",
        ])
        .expect("parse");
        let Command::Apply(args) = cli.command else {
            panic!("expected apply");
        };
        assert_eq!(args.columns, vec!["status", "gender"]);
        assert_eq!(args.codebook.field_names().variable, "var");
        assert!(matches!(
            DuplicatePolicy::from(args.on_duplicate),
            DuplicatePolicy::Reject
        ));
    }

    #[test]
    fn check_has_no_duplicate_policy() {
        let result = Cli::try_parse_from([
            "recode",
            "check",
            "codebook.csv",
            "--on-duplicate",
            "reject",
        ]);
        assert!(result.is_err());
        let cli = Cli::try_parse_from(["recode", "show", "codebook.csv", "--on-duplicate", "warn"])
            .expect("parse");
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert!(matches!(
            DuplicatePolicy::from(args.on_duplicate),
            DuplicatePolicy::Warn
        ));
    }
}
