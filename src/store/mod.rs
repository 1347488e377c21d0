//! Document store backing the engine.
//!
//! In-memory stand-in for the shared remote store. Two operations carry the
//! system's only real atomicity requirements: the conditional guest-join
//! commit ([`RoomStore::update`]) and stats accumulation
//! ([`StatsStore::accumulate_player`] / [`StatsStore::accumulate_matchup`]).

mod error;
mod rooms;
mod stats;

pub use error::StoreError;
pub use rooms::RoomStore;
pub use stats::{GameOutcome, MatchupKey, MatchupRecord, PlayerStats, StatsStore};
