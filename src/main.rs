use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::commands;

/// The main CLI command line interface.
#[derive(Parser)]
#[command(name = "stepbase")]
#[command(version)]
#[command(about = "Today's steps from a cumulative step counter")]
#[command(long_about = "stepbase turns cumulative step-counter readings into a count of\n\
    steps since a stored baseline. The first reading becomes the baseline\n\
    and is kept in ~/.stepbase/ so the count survives restarts.")]
#[command(after_help = "EXAMPLES:\n    \
    stepbase record 10250            Record a reading (first one sets the baseline)\n    \
    stepbase replay readings.txt     Record readings from a file\n    \
    stepbase status                  Show the stored baseline\n    \
    stepbase reset                   Clear the baseline and start over\n\n\
    For more information about a command, run 'stepbase <command> --help'.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show the stored baseline and settings
    Status(commands::status::Args),

    /// Record cumulative step-counter readings
    #[command(long_about = "Feeds the given readings, oldest first, through the step\n\
        counter. If no baseline is stored the first reading becomes the\n\
        baseline. Prints the steps counted since the baseline.")]
    Record(commands::record::Args),

    /// Record readings from a file or stdin
    #[command(long_about = "Like 'record', but reads one reading per line from FILE or\n\
        stdin. Blank lines and lines starting with '#' are skipped.")]
    Replay(commands::replay::Args),

    /// Clear the stored baseline
    #[command(long_about = "Removes the stored baseline. The baseline is never cleared\n\
        automatically, so use this to start a new day's count.")]
    Reset(commands::reset::Args),

    /// View and manage configuration settings
    #[command(long_about = "Provides subcommands to show, get, and set configuration values.\n\
        Configuration is stored in ~/.stepbase/config.yaml.")]
    Config(commands::config::Args),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "stepbase=debug"
    } else {
        "stepbase=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Status(args) => commands::status::run(args),
        Commands::Record(args) => commands::record::run(args),
        Commands::Replay(args) => commands::replay::run(args),
        Commands::Reset(args) => commands::reset::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
