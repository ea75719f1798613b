//! PawMiner Runtime
//!
//! Entry point: CLI args, logging, banner, credential loading, and the
//! supervisor loop that keeps the bot mining forever.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use pawminer::api::client::HttpGameClient;
use pawminer::{banner, config, cycle};

/// PawMiner -- unattended mining bot for the robot-cat game
#[derive(Parser, Debug)]
#[command(
    name = "pawminer",
    version,
    about = "PawMiner -- unattended mining bot for the robot-cat game"
)]
struct Cli {
    /// File holding the bearer token, one line.
    #[arg(long, default_value = config::DEFAULT_TOKEN_FILE)]
    token_file: PathBuf,
}

async fn run(cli: &Cli) -> Result<()> {
    tracing::info!("Reading account data...");
    let token = config::load_token(&cli.token_file)?;

    let client = HttpGameClient::new(&token).context("Failed to build API client")?;

    tracing::info!("Starting automation...");
    cycle::supervisor::run_forever(&client).await;
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    banner::print_banner();

    if let Err(e) = run(&cli).await {
        eprintln!("Fatal: {:#}", e);
        std::process::exit(1);
    }
}
