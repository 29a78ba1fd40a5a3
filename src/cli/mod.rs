//! Command-line interface for stepbase.
//!
//! Provides the CLI commands for feeding step-counter readings through
//! the tracker and inspecting or resetting the stored baseline.

/// Individual CLI command implementations.
pub mod commands;

/// Output format selection.
pub mod format;

/// Interactive permission prompt.
pub mod prompt;

pub use format::{print_json, OutputFormat};
