//! Session entity and state machine for a single room.

use std::hash::{Hash, Hasher};

use chrono::Utc;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::error::EngineError;
use crate::game::{Board, Outcome, Stone, detect_outcome};
use crate::player::{PlayerProfile, Uid};

/// Unique short code identifying a room.
pub type RoomId = String;

/// Lifecycle state of a session.
///
/// `waiting → playing` happens exactly once, when a second distinct player
/// attaches. `finished → playing` is re-entered only via restart.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionStatus {
    /// Host present, guest slot empty.
    Waiting,
    /// Both participants present, moves accepted.
    Playing,
    /// A line or draw was detected; restart is the only way out.
    Finished,
}

/// Result of a concluded game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    /// The named participant won.
    Player(Uid),
    /// Board exhausted with no line.
    Draw,
}

impl Winner {
    /// The winning player's uid, or `None` for a draw.
    pub fn uid(&self) -> Option<&str> {
        match self {
            Winner::Player(uid) => Some(uid),
            Winner::Draw => None,
        }
    }
}

/// The authoritative state of one room.
///
/// A session is a plain value; every transition method takes `&self` and
/// returns the next value without touching shared state. Atomicity of a
/// committed transition is the store's job — the engine hands the store a
/// closure over these methods so the read-modify-write happens under one
/// lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Session {
    /// Room code, immutable after creation.
    id: RoomId,
    /// Creating player, plays black.
    host: PlayerProfile,
    /// Second player, plays white; absent until joined, immutable once set.
    guest: Option<PlayerProfile>,
    /// Current board.
    board: Board,
    /// Uid of the player permitted to move next.
    turn: Uid,
    /// Lifecycle state.
    status: SessionStatus,
    /// Set iff `status` is finished.
    winner: Option<Winner>,
    /// Creation time (UTC millis), used only for ordering room listings.
    created_at: i64,
}

impl Session {
    /// Creates a session in `waiting` state with an empty board.
    #[instrument(skip(host), fields(host_uid = %host.uid()))]
    pub fn new(id: RoomId, host: PlayerProfile, board_size: usize) -> Self {
        info!(room_id = %id, "Creating new session");
        let turn = host.uid().clone();
        Self {
            id,
            host,
            guest: None,
            board: Board::new(board_size),
            turn,
            status: SessionStatus::Waiting,
            winner: None,
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// Returns the participant with the given uid, if any.
    pub fn participant(&self, uid: &str) -> Option<&PlayerProfile> {
        if self.host.uid() == uid {
            Some(&self.host)
        } else {
            self.guest.as_ref().filter(|g| g.uid() == uid)
        }
    }

    /// Checks whether the uid belongs to the host or the guest.
    pub fn is_participant(&self, uid: &str) -> bool {
        self.participant(uid).is_some()
    }

    /// The stone color assigned to the given participant.
    pub fn stone_of(&self, uid: &str) -> Option<Stone> {
        if self.host.uid() == uid {
            Some(Stone::Black)
        } else if self.guest.as_ref().is_some_and(|g| g.uid() == uid) {
            Some(Stone::White)
        } else {
            None
        }
    }

    /// The uid of the participant other than `uid`.
    pub fn opponent_uid(&self, uid: &str) -> Option<&Uid> {
        if self.host.uid() == uid {
            self.guest.as_ref().map(|g| g.uid())
        } else if self.guest.as_ref().is_some_and(|g| g.uid() == uid) {
            Some(self.host.uid())
        } else {
            None
        }
    }

    /// Attaches a guest, transitioning `waiting → playing`.
    ///
    /// This is the precondition half of the guest-join race: the caller must
    /// run it inside the store's atomic update so the guest slot is still
    /// empty at commit time. A competitor losing the race gets
    /// [`EngineError::GuestSlotTaken`] and should re-observe the session as
    /// a spectator rather than erroring.
    #[instrument(skip(self, profile), fields(room_id = %self.id, joiner = %profile.uid()))]
    pub fn attach_guest(&self, profile: PlayerProfile) -> Result<Session, EngineError> {
        if profile.uid() == self.host.uid() {
            return Err(EngineError::SelfJoin);
        }
        if self.status != SessionStatus::Waiting || self.guest.is_some() {
            warn!(status = %self.status, "Guest slot no longer open");
            return Err(EngineError::GuestSlotTaken);
        }

        info!(guest_uid = %profile.uid(), "Guest joined, session now playing");
        let mut next = self.clone();
        next.guest = Some(profile);
        next.status = SessionStatus::Playing;
        Ok(next)
    }

    /// Validates and applies a move, producing the next session state.
    ///
    /// On a non-terminal move only `board` and `turn` change. On a terminal
    /// move `status` and `winner` are set in the same returned value, so a
    /// finished board is never visible as still playing.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotPlaying`] if the session is not in `playing`.
    /// - [`EngineError::UnknownPlayer`] if the actor is not a participant.
    /// - [`EngineError::OutOfTurn`] if the actor does not hold the turn.
    /// - [`EngineError::InvalidMove`] if the cell is occupied or out of range.
    #[instrument(skip(self), fields(room_id = %self.id))]
    pub fn submit_move(&self, acting: &str, index: usize) -> Result<Session, EngineError> {
        if self.status != SessionStatus::Playing {
            warn!(status = %self.status, "Move rejected: session not playing");
            return Err(EngineError::NotPlaying {
                status: self.status.to_string(),
            });
        }
        let stone = self.stone_of(acting).ok_or_else(|| {
            warn!(acting, "Unknown player attempted move");
            EngineError::UnknownPlayer {
                uid: acting.to_string(),
            }
        })?;
        if self.turn != acting {
            warn!(acting, turn = %self.turn, "Player tried to move out of turn");
            return Err(EngineError::OutOfTurn {
                uid: acting.to_string(),
            });
        }

        let mut next = self.clone();
        next.board.place(index, stone)?;

        match detect_outcome(&next.board, index) {
            Outcome::Open => {
                // Turn possession is the mutual-exclusion token: flipping it
                // hands the sole write authorization to the other player.
                next.turn = self
                    .opponent_uid(acting)
                    .cloned()
                    .unwrap_or_else(|| self.host.uid().clone());
                info!(index, next_turn = %next.turn, "Move accepted");
            }
            Outcome::Line(_) => {
                next.status = SessionStatus::Finished;
                next.winner = Some(Winner::Player(acting.to_string()));
                info!(index, winner = acting, "Move completed a line, session finished");
            }
            Outcome::Draw => {
                next.status = SessionStatus::Finished;
                next.winner = Some(Winner::Draw);
                info!(index, "Board exhausted, session finished in a draw");
            }
        }

        Ok(next)
    }

    /// Restarts a finished game: fresh board, host moves first.
    ///
    /// Either participant may restart (explicit policy decision — the
    /// host's identity only governs initial turn assignment).
    #[instrument(skip(self), fields(room_id = %self.id))]
    pub fn restart(&self, acting: &str) -> Result<Session, EngineError> {
        if !self.is_participant(acting) {
            warn!(acting, "Non-participant attempted restart");
            return Err(EngineError::UnknownPlayer {
                uid: acting.to_string(),
            });
        }
        if self.status != SessionStatus::Finished {
            warn!(status = %self.status, "Restart rejected: session not finished");
            return Err(EngineError::NotFinished);
        }

        info!(acting, "Restarting game");
        let mut next = self.clone();
        next.board = Board::new(self.board.size());
        next.turn = self.host.uid().clone();
        next.status = SessionStatus::Playing;
        next.winner = None;
        Ok(next)
    }

    /// Content fingerprint of a concluded game.
    ///
    /// Stable across duplicate observations of the same terminal state;
    /// used by the ledger to suppress double recording.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = std::hash::DefaultHasher::new();
        self.id.hash(&mut hasher);
        self.board.cells().hash(&mut hasher);
        self.winner.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waiting_session() -> Session {
        Session::new(
            "ROOM".to_string(),
            PlayerProfile::named("host-1", "Host"),
            10,
        )
    }

    fn playing_session() -> Session {
        waiting_session()
            .attach_guest(PlayerProfile::named("guest-1", "Guest"))
            .expect("Join failed")
    }

    #[test]
    fn test_new_session_is_waiting_with_host_turn() {
        let session = waiting_session();
        assert_eq!(*session.status(), SessionStatus::Waiting);
        assert_eq!(session.turn().as_str(), "host-1");
        assert!(session.guest().is_none());
        assert_eq!(session.board().area(), 100);
    }

    #[test]
    fn test_attach_guest_transitions_to_playing() {
        let session = playing_session();
        assert_eq!(*session.status(), SessionStatus::Playing);
        assert_eq!(
            session.guest().as_ref().map(|g| g.uid().as_str()),
            Some("guest-1")
        );
        assert_eq!(session.stone_of("host-1"), Some(Stone::Black));
        assert_eq!(session.stone_of("guest-1"), Some(Stone::White));
    }

    #[test]
    fn test_host_cannot_join_own_room() {
        let session = waiting_session();
        let err = session
            .attach_guest(PlayerProfile::named("host-1", "Host"))
            .unwrap_err();
        assert_eq!(err, EngineError::SelfJoin);
    }

    #[test]
    fn test_second_joiner_loses_race() {
        let session = playing_session();
        let err = session
            .attach_guest(PlayerProfile::named("guest-2", "Late"))
            .unwrap_err();
        assert_eq!(err, EngineError::GuestSlotTaken);
    }

    #[test]
    fn test_move_rejected_while_waiting() {
        let session = waiting_session();
        let err = session.submit_move("host-1", 0).unwrap_err();
        assert!(matches!(err, EngineError::NotPlaying { .. }));
    }

    #[test]
    fn test_move_rejected_out_of_turn() {
        let session = playing_session();
        let err = session.submit_move("guest-1", 0).unwrap_err();
        assert_eq!(
            err,
            EngineError::OutOfTurn {
                uid: "guest-1".to_string()
            }
        );
    }

    #[test]
    fn test_move_rejected_for_stranger() {
        let session = playing_session();
        let err = session.submit_move("nobody", 0).unwrap_err();
        assert!(matches!(err, EngineError::UnknownPlayer { .. }));
    }

    #[test]
    fn test_accepted_move_flips_turn_only() {
        let session = playing_session();
        let next = session.submit_move("host-1", 0).expect("Move failed");
        assert_eq!(next.turn().as_str(), "guest-1");
        assert_eq!(*next.status(), SessionStatus::Playing);
        assert!(next.winner().is_none());
        // Occupied cell rejected thereafter.
        let err = next.submit_move("guest-1", 0).unwrap_err();
        assert_eq!(err, EngineError::InvalidMove { index: 0 });
    }

    #[test]
    fn test_winning_move_sets_status_and_winner_together() {
        let mut session = playing_session();
        // Host: 0..4 horizontal; guest: scattered on another row.
        for (h, g) in [(0, 50), (1, 51), (2, 52), (3, 53)] {
            session = session.submit_move("host-1", h).expect("Host move failed");
            session = session.submit_move("guest-1", g).expect("Guest move failed");
        }
        let finished = session.submit_move("host-1", 4).expect("Winning move failed");
        assert_eq!(*finished.status(), SessionStatus::Finished);
        assert_eq!(
            *finished.winner(),
            Some(Winner::Player("host-1".to_string()))
        );
        // No further moves accepted.
        let err = finished.submit_move("guest-1", 60).unwrap_err();
        assert!(matches!(err, EngineError::NotPlaying { .. }));
    }

    #[test]
    fn test_restart_resets_board_turn_and_winner() {
        let mut session = playing_session();
        for (h, g) in [(0, 50), (1, 51), (2, 52), (3, 53)] {
            session = session.submit_move("host-1", h).expect("Host move failed");
            session = session.submit_move("guest-1", g).expect("Guest move failed");
        }
        let finished = session.submit_move("host-1", 4).expect("Winning move failed");

        // Guest may invoke restart.
        let fresh = finished.restart("guest-1").expect("Restart failed");
        assert_eq!(*fresh.status(), SessionStatus::Playing);
        assert_eq!(fresh.turn().as_str(), "host-1");
        assert!(fresh.winner().is_none());
        assert_eq!(fresh.board().empty_count(), 100);
    }

    #[test]
    fn test_restart_rejected_while_playing() {
        let session = playing_session();
        assert_eq!(
            session.restart("host-1").unwrap_err(),
            EngineError::NotFinished
        );
    }

    #[test]
    fn test_fingerprint_distinguishes_terminal_states() {
        let mut session = playing_session();
        for (h, g) in [(0, 50), (1, 51), (2, 52), (3, 53)] {
            session = session.submit_move("host-1", h).expect("Host move failed");
            session = session.submit_move("guest-1", g).expect("Guest move failed");
        }
        let finished = session.submit_move("host-1", 4).expect("Winning move failed");
        assert_eq!(finished.fingerprint(), finished.clone().fingerprint());
        assert_ne!(finished.fingerprint(), session.fingerprint());
    }
}
