use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::App;

#[derive(Parser)]
#[command(name = "lcdesk")]
#[command(about = "LCDesk - trade finance session and review workflow manager", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.lcdesk/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage review sessions
    Session {
        #[command(subcommand)]
        action: commands::sessions::SessionAction,
    },
    /// List lifecycle templates
    Lifecycles {
        /// Only transitions of this instrument
        #[arg(long)]
        instrument: Option<String>,
    },
    /// Upload documents to a session
    Upload {
        #[command(subcommand)]
        action: commands::upload::UploadAction,
    },
    /// Work the review pipeline of the current session
    Review {
        #[command(subcommand)]
        action: commands::review::ReviewAction,
    },
    /// Look up a vessel position by MMSI
    Vessel { mmsi: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lcdesk=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let app = App::bootstrap(cli.config)?;

    match cli.command {
        Commands::Session { action } => commands::sessions::run(&app, action).await,
        Commands::Lifecycles { instrument } => commands::lifecycles::run(&app, instrument).await,
        Commands::Upload { action } => commands::upload::run(&app, action).await,
        Commands::Review { action } => commands::review::run(&app, action).await,
        Commands::Vessel { mmsi } => commands::vessel::run(&app, &mmsi).await,
    }
}
