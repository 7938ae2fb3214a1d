use anyhow::Result;
use autotrans_core::translation::Direction;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "autotrans")]
#[command(about = "autotrans - time-boxed continuous translation of chat messages", long_about = None)]
struct Cli {
    /// Settings file to use instead of the platform default
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a text once with the configured service
    Translate {
        /// Which language pair to use
        #[arg(long, short, default_value = "received")]
        direction: Direction,

        text: String,
    },
    /// Start a 10 minute auto-translation session for a channel
    Enable { channel: String },
    /// End the auto-translation session
    Disable,
    /// Show the auto-translation session and its remaining time
    Status,
    /// Inspect or edit translation settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current settings
    Show,
    /// Set a settings key (service, deeplApiKey, receivedInput, receivedOutput,
    /// sentInput, sentOutput, autoTranslate)
    Set { key: String, value: String },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let app = commands::App::open(cli.settings)?;

    match cli.command {
        Commands::Translate { direction, text } => {
            commands::translate::run(&app, direction, &text).await?
        }
        Commands::Enable { channel } => commands::session::enable(&app, &channel),
        Commands::Disable => commands::session::disable(&app),
        Commands::Status => commands::session::status(&app),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&app),
            ConfigAction::Set { key, value } => commands::config::set(&app, &key, &value)?,
        },
    }

    Ok(())
}
