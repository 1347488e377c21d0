//! Command-line interface for omok_rooms.

use clap::{Parser, Subcommand};

/// Omok Rooms - five-in-a-row game rooms over a shared document store
#[derive(Parser, Debug)]
#[command(name = "omok_rooms")]
#[command(about = "Five-in-a-row game room server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP room server
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Board side length
        #[arg(long, default_value = "10")]
        board_size: usize,
    },
}
