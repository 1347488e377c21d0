//! Omok Rooms - unified CLI.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use omok_rooms::{AppState, Cli, Command, router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            host,
            port,
            board_size,
        } => serve(host, port, board_size).await,
    }
}

/// Run the HTTP room server.
async fn serve(host: String, port: u16, board_size: usize) -> Result<()> {
    let state = AppState::new(board_size);
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    info!(addr = %addr, board_size, "Starting room server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
