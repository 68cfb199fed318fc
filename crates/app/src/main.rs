//! The Move - campus event board
//!
//! Command line front end: browse, post, join and discuss moves.

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod clock;
mod display;
mod state;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = start().await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

async fn start() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = cli.load_config()?;

    tracing::info!(
        user = %config.user.name,
        backend = ?config.storage.backend,
        "Starting The Move"
    );

    let mut board = state::BoardState::open(&config).context("failed to open board")?;
    cli.command.invoke(&mut board, &cli, &config).await
}
