//! Quoridor Server - REST game service entry point.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use quoridor_server::{serve, Cli, Command, GameRegistry, GameRepository, GameStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { port, host } => run_server(host, port).await,
    }
}

/// Run the HTTP game server
async fn run_server(host: String, port: u16) -> Result<()> {
    info!("Starting Quoridor game server");

    let store = GameRepository::from_env().map(|repo| Arc::new(repo) as Arc<dyn GameStore>);
    let registry = Arc::new(GameRegistry::new(store));

    serve(&host, port, registry).await
}
