//! Status command - show current stepbase state.
//!
//! Displays the stored baseline, where data lives on disk, and the
//! permission and sensor settings the next recording will use.

use anyhow::{Context, Result};
use colored::Colorize;

use stepbase::config::Config;
use stepbase::permission::{check_permission, Capability, PermissionStatus};
use stepbase::storage::db::{data_dir, default_db_path};
use stepbase::storage::{Database, BASELINE_STEPS_KEY};

use crate::cli::{print_json, OutputFormat};

/// Arguments for the status command.
#[derive(clap::Args)]
pub struct Args {
    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the status command.
pub fn run(args: Args) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let db_path = default_db_path()?;
    let db = Database::open(&db_path).context("Failed to open preference store")?;
    let baseline = db.get_preference(BASELINE_STEPS_KEY)?;
    let permission = check_permission(&config, Capability::ActivityRecognition);

    if args.format == OutputFormat::Json {
        let output = serde_json::json!({
            "data_dir": data_dir()?,
            "database": db_path,
            "config": Config::config_path()?,
            "baseline": baseline,
            "permission": permission,
            "sensor_delay": config.sensor_delay,
        });
        return print_json(&output);
    }

    println!("{}", "stepbase".bold().cyan());
    println!("{}", "Steps since your baseline".dimmed());
    println!();

    match &baseline {
        Some(pref) => {
            let set_at = pref.updated_at.with_timezone(&chrono::Local);
            println!("  {}  {}", "Baseline:".dimmed(), pref.value);
            println!(
                "  {}  {}",
                "Set at:".dimmed(),
                set_at.format("%Y-%m-%d %H:%M")
            );

            let days = pref.days_since_update(chrono::Local::now().date_naive());
            if days > 0 {
                println!();
                println!(
                    "{}",
                    format!(
                        "Baseline was captured {days} day(s) ago; counts keep accumulating \
                        until 'stepbase reset'."
                    )
                    .yellow()
                );
            }
        }
        None => {
            println!("  {}  {}", "Baseline:".dimmed(), "not set".yellow());
            println!();
            println!("The next reading recorded becomes the baseline.");
        }
    }

    println!();
    println!("{}", "Settings:".bold());
    let permission_str = match permission {
        PermissionStatus::Granted => "granted".green(),
        PermissionStatus::NotRequired => "not required".green(),
        PermissionStatus::Denied => "not granted".yellow(),
    };
    println!("  {}  {}", "Activity recognition:".dimmed(), permission_str);
    println!("  {}  {}", "Sensor delay:".dimmed(), config.sensor_delay);
    println!("  {}  {}", "Database:".dimmed(), db_path.display());

    Ok(())
}
