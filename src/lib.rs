//! Omok Rooms - five-in-a-row game rooms over a shared document store.
//!
//! Two remote players synchronize a 10×10 five-in-a-row match through a
//! key-value document store offering atomic read-modify-write per key and
//! push-based subscription.
//!
//! # Architecture
//!
//! - **Game**: board storage plus pure win/draw rules, scan centered on the
//!   last move
//! - **Session**: the authoritative room state machine
//!   (`waiting → playing → finished`) with value-returning transitions
//! - **Store**: in-memory document store providing the two required
//!   atomicity guarantees (conditional guest join, accumulate-in-place)
//! - **Directory**: room-code allocation and lobby listings
//! - **Ledger**: exactly-once post-game statistics aggregation
//! - **Client**: per-player attachment with subscription and auto-join
//! - **Server**: axum HTTP glue over the engine

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod cli;
mod client;
mod directory;
mod error;
mod game;
mod ledger;
mod player;
mod server;
mod session;
mod store;

// Crate-level exports - CLI
pub use cli::{Cli, Command};

// Crate-level exports - game types
pub use game::{Board, Cell, Outcome, Stone, WIN_LEN, detect_outcome, is_full, line_through};

// Crate-level exports - players and sessions
pub use player::{PlayerProfile, Uid};
pub use session::{RoomId, Session, SessionStatus, Winner};

// Crate-level exports - store
pub use store::{
    GameOutcome, MatchupKey, MatchupRecord, PlayerStats, RoomStore, StatsStore, StoreError,
};

// Crate-level exports - directory and ledger
pub use directory::RoomDirectory;
pub use ledger::StatsLedger;

// Crate-level exports - client attachment
pub use client::{Role, RoomClient};

// Crate-level exports - HTTP surface
pub use server::{
    AppState, CreateRoomRequest, JoinRoomRequest, JoinRoomResponse, MoveRequest, RestartRequest,
    router,
};

// Crate-level exports - errors
pub use error::EngineError;
