#![warn(clippy::all, clippy::pedantic)]

use aerodoc::Config;
use aerodoc::chat;
use aerodoc::cli::{Cli, Commands};
use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();
    let config = Config::load_or_init()?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => chat::run(&config).await,
        Commands::Sessions => chat::list_sessions(&config),
        Commands::Delete { id } => chat::delete_session(&config, &id),
    }
}
