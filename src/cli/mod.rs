//! CLI argument parsing and report output
//!
//! Arguments are defined with clap derive; reports print as a table, JSON
//! or a single compact line.

pub mod args;
pub mod output;

pub use args::{CheckArgs, Cli, Commands, OutputFormat, ValidateArgs};
pub use output::{print_output, TableDisplay};
