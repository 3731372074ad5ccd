// CLI module
// Command-line interface, argument parsing and command execution

mod args;
pub mod commands;

pub use args::{CliArgs, Command, Credentials, HistoryKind};
pub use commands::execute;

use clap::Parser;

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments, missing required arguments, or
/// `--help`), clap prints an error or the help text and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
