//! Reset command - clear the stored baseline.
//!
//! The baseline is never cleared automatically, so this is how a new day
//! (or any new count) is started.

use anyhow::{Context, Result};
use colored::Colorize;

use stepbase::storage::PreferenceStore;
use stepbase::tracker::StepBaselineTracker;

/// Arguments for the reset command.
#[derive(clap::Args)]
pub struct Args {}

/// Executes the reset command.
pub fn run(_args: Args) -> Result<()> {
    let store = PreferenceStore::open_default().context("Failed to open preference store")?;
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    let previous = rt.block_on(async {
        let mut tracker = StepBaselineTracker::load(store).await;
        let previous = tracker.baseline();
        tracker.clear_baseline().await.map(|()| previous)
    })?;

    match previous {
        Some(baseline) => println!(
            "{} (was {})",
            "Baseline cleared".green(),
            baseline
        ),
        None => println!("{}", "No baseline stored.".dimmed()),
    }
    println!("The next reading will start a new count from zero.");

    Ok(())
}
