//! Statistics records and their atomic accumulation store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::player::Uid;

/// Per-player aggregate record.
///
/// Created lazily on first observation of a player; never deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PlayerStats {
    /// Games won.
    wins: u32,
    /// Games lost.
    losses: u32,
    /// Games drawn.
    draws: u32,
    /// Total concluded games.
    total_games: u32,
    /// Win rate as an integer percentage; zero games means zero rate.
    win_rate: u32,
}

impl PlayerStats {
    /// Applies one concluded game from this player's perspective and
    /// recomputes the win rate.
    pub fn apply(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::Win => self.wins += 1,
            GameOutcome::Loss => self.losses += 1,
            GameOutcome::Draw => self.draws += 1,
        }
        self.total_games += 1;
        self.win_rate = if self.total_games == 0 {
            0
        } else {
            (100.0 * f64::from(self.wins) / f64::from(self.total_games)).round() as u32
        };
    }
}

/// A concluded game from one player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum GameOutcome {
    /// Player won.
    Win,
    /// Player lost.
    Loss,
    /// Game was drawn.
    Draw,
}

/// Canonical unordered pair of player identities.
///
/// Lexicographic ordering guarantees one record per pair regardless of who
/// hosted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchupKey {
    first: Uid,
    second: Uid,
}

impl MatchupKey {
    /// Builds the canonical key for two identities.
    pub fn new(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            first: first.to_string(),
            second: second.to_string(),
        }
    }
}

/// Head-to-head record for one pair of players.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct MatchupRecord {
    /// Win count per player uid.
    wins: HashMap<Uid, u32>,
    /// Drawn games between the pair.
    draws: u32,
}

impl MatchupRecord {
    /// Credits a win to the given player.
    pub fn add_win(&mut self, uid: &str) {
        *self.wins.entry(uid.to_string()).or_insert(0) += 1;
    }

    /// Records a drawn game.
    pub fn add_draw(&mut self) {
        self.draws += 1;
    }

    /// Win count for the given player.
    pub fn wins_for(&self, uid: &str) -> u32 {
        self.wins.get(uid).copied().unwrap_or(0)
    }
}

/// Store of aggregate records with atomic accumulate-in-place per key.
///
/// Each accumulation holds the map lock across the whole read-modify-write,
/// so concurrent writers against the same key never lose updates — N
/// interleaved increments always sum to N.
#[derive(Debug, Clone)]
pub struct StatsStore {
    players: Arc<Mutex<HashMap<Uid, PlayerStats>>>,
    matchups: Arc<Mutex<HashMap<MatchupKey, MatchupRecord>>>,
}

impl StatsStore {
    /// Creates an empty stats store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating stats store");
        Self {
            players: Arc::new(Mutex::new(HashMap::new())),
            matchups: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Atomically accumulates into a player's record, creating it lazily.
    #[instrument(skip(self, accumulate))]
    pub fn accumulate_player(
        &self,
        uid: &str,
        accumulate: impl FnOnce(&mut PlayerStats),
    ) -> PlayerStats {
        let mut players = self.players.lock().unwrap();
        let stats = players.entry(uid.to_string()).or_default();
        accumulate(stats);
        debug!(uid, total_games = stats.total_games, "Player record accumulated");
        stats.clone()
    }

    /// Atomically accumulates into a matchup record, creating it lazily.
    #[instrument(skip(self, key, accumulate))]
    pub fn accumulate_matchup(
        &self,
        key: &MatchupKey,
        accumulate: impl FnOnce(&mut MatchupRecord),
    ) -> MatchupRecord {
        let mut matchups = self.matchups.lock().unwrap();
        let record = matchups.entry(key.clone()).or_default();
        accumulate(record);
        debug!(draws = record.draws, "Matchup record accumulated");
        record.clone()
    }

    /// Reads a player's record, if one has been created.
    #[instrument(skip(self))]
    pub fn player(&self, uid: &str) -> Option<PlayerStats> {
        self.players.lock().unwrap().get(uid).cloned()
    }

    /// Reads a matchup record, if one has been created.
    #[instrument(skip(self, key))]
    pub fn matchup(&self, key: &MatchupKey) -> Option<MatchupRecord> {
        self.matchups.lock().unwrap().get(key).cloned()
    }
}

impl Default for StatsStore {
    fn default() -> Self {
        Self::new()
    }
}
