//! Replay command - feed readings from a file or stdin.
//!
//! Reads one cumulative step-counter value per line. Blank lines and lines
//! starting with `#` are skipped.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use crate::cli::commands::record::track_readings;
use crate::cli::OutputFormat;

/// Arguments for the replay command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    stepbase replay readings.txt     Replay readings from a file\n    \
    cat readings.txt | stepbase replay\n                                     Replay readings from stdin")]
pub struct Args {
    /// File with one reading per line (reads stdin if omitted)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the replay command.
pub fn run(args: Args) -> Result<()> {
    let readings = match &args.file {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            parse_readings(BufReader::new(file))?
        }
        None => parse_readings(io::stdin().lock())?,
    };

    tracing::debug!(count = readings.len(), "Parsed readings");
    track_readings(readings, args.format, args.file.is_none())
}

/// Parses one reading per line, skipping blanks and `#` comments.
pub fn parse_readings<R: BufRead>(reader: R) -> Result<Vec<f32>> {
    let mut readings = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read input")?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match trimmed.parse::<f32>() {
            Ok(value) => readings.push(value),
            Err(_) => bail!("Line {}: '{}' is not a step reading", idx + 1, trimmed),
        }
    }

    Ok(readings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_readings_skips_comments_and_blanks() {
        let input = "# morning walk\n1000\n\n  1200.5 \n# lunch\n1500\n";
        let readings = parse_readings(input.as_bytes()).expect("parse");
        assert_eq!(readings, vec![1000.0, 1200.5, 1500.0]);
    }

    #[test]
    fn test_parse_readings_reports_line_number() {
        let input = "1000\nabc\n";
        let err = parse_readings(input.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Line 2"), "got: {err}");
    }

    #[test]
    fn test_parse_readings_empty_input() {
        let readings = parse_readings("".as_bytes()).expect("parse");
        assert!(readings.is_empty());
    }
}
