use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pomotrack", version, about = "Pomodoro interval tracker")]
struct Cli {
    /// Interval database (default: ~/.config/pomotrack/pomotrack.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Settings file (default: ~/.config/pomotrack/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    durations: commands::DurationArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start or resume the current interval and run it
    Start,
    /// Pause the running interval
    Pause,
    /// Print the most recent interval as JSON
    Status,
    /// Print the category the next new interval would get
    Next,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = commands::Context {
        db: cli.db,
        config: cli.config,
        durations: cli.durations,
    };

    let result = match cli.command {
        Commands::Start => commands::interval::start(&ctx).await,
        Commands::Pause => commands::interval::pause(&ctx),
        Commands::Status => commands::interval::status(&ctx),
        Commands::Next => commands::interval::next(&ctx),
        Commands::Config { action } => commands::config::run(action, &ctx),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
