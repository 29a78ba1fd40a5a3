//! CLI commands for stepbase.
//!
//! Each submodule implements a single CLI command with its argument
//! parsing and execution logic.

/// Configuration viewing and management.
pub mod config;

/// Feed readings given on the command line.
pub mod record;

/// Feed readings from a file or stdin.
pub mod replay;

/// Clear the stored baseline.
pub mod reset;

/// Show the stored baseline and settings.
pub mod status;
