//! Post-game statistics aggregation.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, instrument, warn};

use crate::error::EngineError;
use crate::session::{Session, SessionStatus, Winner};
use crate::store::{GameOutcome, MatchupKey, MatchupRecord, PlayerStats, StatsStore};

/// Records each concluded game into player and matchup aggregates exactly
/// once.
///
/// Multiple subscribers may observe the same terminal session and trigger
/// recording; duplicates are suppressed by a content fingerprint of the
/// finished game, and the underlying accumulation is atomic per key, so
/// even a race on the same record never loses an update.
#[derive(Debug, Clone)]
pub struct StatsLedger {
    store: StatsStore,
    recorded: Arc<Mutex<HashSet<u64>>>,
}

impl StatsLedger {
    /// Creates a ledger over the given stats store.
    #[instrument(skip(store))]
    pub fn new(store: StatsStore) -> Self {
        info!("Creating stats ledger");
        Self {
            store,
            recorded: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Records the outcome of a finished session.
    ///
    /// Returns `true` if the game was recorded, `false` if this concluded
    /// game was already recorded (duplicate trigger, counters untouched).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFinished`] unless the session is finished
    /// with a winner set, and [`EngineError::MissingGuest`] if the guest is
    /// absent.
    #[instrument(skip(self, session), fields(room_id = %session.id()))]
    pub fn record_outcome(&self, session: &Session) -> Result<bool, EngineError> {
        if *session.status() != SessionStatus::Finished {
            warn!(status = %session.status(), "Refusing to record unfinished game");
            return Err(EngineError::NotFinished);
        }
        let winner = session.winner().as_ref().ok_or(EngineError::NotFinished)?;
        let guest = session.guest().as_ref().ok_or(EngineError::MissingGuest)?;
        let host = session.host();

        // Duplicate-trigger suppression, keyed on the concluded game's
        // content fingerprint.
        {
            let mut recorded = self.recorded.lock().unwrap();
            if !recorded.insert(session.fingerprint()) {
                debug!("Outcome already recorded, suppressing duplicate");
                return Ok(false);
            }
        }

        let host_uid = host.uid().as_str();
        let guest_uid = guest.uid().as_str();

        match winner {
            Winner::Draw => {
                self.store
                    .accumulate_player(host_uid, |s| s.apply(GameOutcome::Draw));
                self.store
                    .accumulate_player(guest_uid, |s| s.apply(GameOutcome::Draw));
            }
            Winner::Player(winner_uid) => {
                let loser_uid = if winner_uid == host_uid {
                    guest_uid
                } else {
                    host_uid
                };
                self.store
                    .accumulate_player(winner_uid, |s| s.apply(GameOutcome::Win));
                self.store
                    .accumulate_player(loser_uid, |s| s.apply(GameOutcome::Loss));
            }
        }

        let key = MatchupKey::new(host_uid, guest_uid);
        self.store.accumulate_matchup(&key, |record| match winner {
            Winner::Draw => record.add_draw(),
            Winner::Player(winner_uid) => record.add_win(winner_uid),
        });

        info!(winner = ?winner, "Outcome recorded");
        Ok(true)
    }

    /// Reads a player's aggregate record.
    #[instrument(skip(self))]
    pub fn player_stats(&self, uid: &str) -> Option<PlayerStats> {
        self.store.player(uid)
    }

    /// Reads the head-to-head record for a pair of players.
    #[instrument(skip(self))]
    pub fn matchup(&self, a: &str, b: &str) -> Option<MatchupRecord> {
        self.store.matchup(&MatchupKey::new(a, b))
    }
}
