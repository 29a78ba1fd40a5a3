//! Output selection for CLI commands.
//!
//! Commands that print a report accept `--format text|json`; JSON goes to
//! stdout unadorned so it can be piped into other tools.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

/// How a command renders its result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable lines (default).
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
