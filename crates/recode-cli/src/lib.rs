//! Library components of the `recode` command-line tool.

pub mod logging;
pub mod pipeline;
