//! Record command - feed step-counter readings through the tracker.
//!
//! Each reading is treated as a cumulative step-counter event. The first
//! reading after the baseline was cleared becomes the new baseline; the
//! rest are reported relative to it.

use anyhow::{Context, Result};
use colored::Colorize;

use stepbase::config::Config;
use stepbase::sensor::ReplaySource;
use stepbase::storage::PreferenceStore;
use stepbase::tracker::{StepBaselineTracker, StepCounterSession, StepReport, TrackingState};

use crate::cli::prompt::PromptPermissionGate;
use crate::cli::{print_json, OutputFormat};

/// Arguments for the record command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    stepbase record 10250            Record a single reading\n    \
    stepbase record 10250 10400      Record several readings in order\n    \
    stepbase record 10400 -f json    Output the result as JSON")]
pub struct Args {
    /// Cumulative step-counter readings, oldest first
    #[arg(required = true, value_name = "READING", allow_negative_numbers = true)]
    pub readings: Vec<f32>,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the record command.
pub fn run(args: Args) -> Result<()> {
    track_readings(args.readings, args.format, false)
}

/// Runs `readings` through a step-counter session over the default store
/// and prints the resulting report.
///
/// Set `stdin_in_use` when the readings were read from stdin; the
/// permission prompt is skipped then.
pub fn track_readings(
    readings: Vec<f32>,
    format: OutputFormat,
    stdin_in_use: bool,
) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let store = PreferenceStore::open_default().context("Failed to open preference store")?;

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let report = rt.block_on(async {
        let tracker = StepBaselineTracker::load(store).await;
        let source = ReplaySource::from_readings(readings);
        let gate = PromptPermissionGate::new(config.clone(), stdin_in_use);
        let mut session = StepCounterSession::new(tracker, source, gate, config.sensor_delay);

        if session.resume() == TrackingState::PermissionRequired
            && session.request_permission().await.allows_access()
        {
            session.resume();
        }

        session.run().await;
        session.shutdown().await
    });

    print_report(&report, format)
}

fn print_report(report: &StepReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(report)?,
        OutputFormat::Text => match report.state {
            TrackingState::PermissionRequired => {
                println!(
                    "{}",
                    "Activity recognition permission is required to count steps.".yellow()
                );
                println!();
                println!(
                    "Run 'stepbase record' in a terminal to be asked, or run \
                    'stepbase config set permission_granted true'."
                );
            }
            TrackingState::Unsupported => {
                println!("{}", "This device has no step counter.".yellow());
            }
            _ => {
                println!(
                    "{} {}",
                    "Steps today:".bold(),
                    report.steps_today.to_string().green()
                );
                if let Some(baseline) = report.baseline {
                    println!("  {}  {}", "Baseline:".dimmed(), baseline);
                }
            }
        },
    }
    Ok(())
}
