//! Engine error types.

use derive_more::{Display, Error, From};

use crate::store::StoreError;

/// Errors surfaced by room and ledger operations.
///
/// No variant is fatal to the process; every failure is scoped to a single
/// room interaction. Move rejections (`InvalidMove`, `OutOfTurn`,
/// `NotPlaying`, `UnknownPlayer`) happen before any store write, so callers
/// may treat them as no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum EngineError {
    /// Target cell is out of range or already occupied.
    #[display("invalid move: cell {index} is out of range or occupied")]
    InvalidMove {
        /// Board index that was rejected.
        index: usize,
    },

    /// Acting player does not hold the turn.
    #[display("illegal move: it is not {uid}'s turn")]
    OutOfTurn {
        /// The player who tried to move.
        uid: String,
    },

    /// Moves are only accepted while the session is playing.
    #[display("illegal move: session is {status}, not playing")]
    NotPlaying {
        /// Current session status.
        status: String,
    },

    /// Acting player is neither host nor guest of the session.
    #[display("player {uid} is not a participant of this session")]
    UnknownPlayer {
        /// Unrecognized player id.
        uid: String,
    },

    /// The subscribed room disappeared or never existed.
    #[display("session {code} not found")]
    SessionNotFound {
        /// Room code that failed to resolve.
        code: String,
    },

    /// The guest slot was filled before the join committed.
    #[display("guest slot already taken")]
    GuestSlotTaken,

    /// A player may not join a room they host.
    #[display("host cannot join their own room as guest")]
    SelfJoin,

    /// Restart is only valid on a finished session.
    #[display("session is not finished")]
    NotFinished,

    /// Outcome recording requires both participants.
    #[display("session has no guest")]
    MissingGuest,

    /// Room deletion is restricted to the host.
    #[display("only the host may delete the room")]
    NotHost,

    /// Room-code allocation gave up after repeated collisions.
    #[display("could not allocate a free room code")]
    RoomCodeExhausted,

    /// Underlying store failure.
    #[display("store error: {_0}")]
    #[from]
    Store(StoreError),
}
