//! Client-side view of one room: subscription, auto-join, move submission.

use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::error::EngineError;
use crate::player::PlayerProfile;
use crate::session::{Session, SessionStatus};
use crate::store::{RoomStore, StoreError};

/// How an attached client relates to the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The creating player.
    Host,
    /// The second player.
    Guest,
    /// Watching only; either a late joiner or a join-race loser.
    Spectator,
}

/// A player's attachment to one room.
///
/// Holds the subscription to the room document plus the client-local
/// last-move hint. The hint is presentation-only: it is never persisted,
/// and it resets on restart or reattachment.
#[derive(Debug)]
pub struct RoomClient {
    store: RoomStore,
    profile: PlayerProfile,
    room_id: String,
    role: Role,
    receiver: watch::Receiver<Option<Session>>,
    last_move: Option<usize>,
}

impl RoomClient {
    /// Attaches to the room with the given code.
    ///
    /// If the room is waiting and the profile is not the host, a
    /// conditional join is attempted; losing the join race silently demotes
    /// the client to spectator.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SessionNotFound`] if no room exists at the
    /// code.
    #[instrument(skip(store, profile), fields(uid = %profile.uid()))]
    pub fn attach(
        store: &RoomStore,
        code: &str,
        profile: PlayerProfile,
    ) -> Result<Self, EngineError> {
        let not_found = |_: StoreError| EngineError::SessionNotFound {
            code: code.to_string(),
        };
        let receiver = store.subscribe(code).map_err(not_found)?;
        let current = store.get(code).map_err(not_found)?;

        let role = if current.host().uid() == profile.uid() {
            Role::Host
        } else if *current.status() == SessionStatus::Waiting {
            match store.update(code, |s| s.attach_guest(profile.clone())) {
                Ok(_) => Role::Guest,
                Err(EngineError::GuestSlotTaken) => {
                    // Lost the race; re-observe as spectator.
                    debug!("Join race lost, attaching as spectator");
                    Role::Spectator
                }
                Err(other) => return Err(other),
            }
        } else if current
            .guest()
            .as_ref()
            .is_some_and(|g| g.uid() == profile.uid())
        {
            // Rejoining a game already underway, e.g. after a reload.
            Role::Guest
        } else {
            Role::Spectator
        };

        info!(room_id = code, ?role, "Attached to room");
        Ok(Self {
            store: store.clone(),
            profile,
            room_id: code.to_string(),
            role,
            receiver,
            last_move: None,
        })
    }

    /// This client's role in the room.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The most recent move this client committed, for UI highlighting
    /// only. Not part of the authoritative session.
    pub fn last_move(&self) -> Option<usize> {
        self.last_move
    }

    /// Current value of the room document.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SessionNotFound`] once the room has been
    /// deleted — callers should fall back to the lobby.
    pub fn snapshot(&self) -> Result<Session, EngineError> {
        self.receiver
            .borrow()
            .clone()
            .ok_or_else(|| EngineError::SessionNotFound {
                code: self.room_id.clone(),
            })
    }

    /// Waits for the next change to the room document and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SessionNotFound`] when the room is deleted
    /// (the value disappears or the publisher is dropped).
    pub async fn changed(&mut self) -> Result<Session, EngineError> {
        let gone = || EngineError::SessionNotFound {
            code: self.room_id.clone(),
        };
        self.receiver.changed().await.map_err(|_| gone())?;
        self.receiver.borrow().clone().ok_or_else(gone)
    }

    /// Submits a move for this client and remembers it as the local hint.
    #[instrument(skip(self), fields(room_id = %self.room_id, uid = %self.profile.uid()))]
    pub fn submit_move(&mut self, index: usize) -> Result<Session, EngineError> {
        let uid = self.profile.uid().clone();
        let next = self
            .store
            .update(&self.room_id, |s| s.submit_move(&uid, index))?;
        self.last_move = Some(index);
        Ok(next)
    }

    /// Restarts the finished game and clears the local move hint.
    #[instrument(skip(self), fields(room_id = %self.room_id))]
    pub fn restart(&mut self) -> Result<Session, EngineError> {
        let uid = self.profile.uid().clone();
        let next = self.store.update(&self.room_id, |s| s.restart(&uid))?;
        self.last_move = None;
        Ok(next)
    }

    /// Deletes the room. Host only.
    #[instrument(skip(self), fields(room_id = %self.room_id))]
    pub fn delete_room(&self) -> Result<(), EngineError> {
        let session = self.snapshot()?;
        if session.host().uid() != self.profile.uid() {
            warn!(uid = %self.profile.uid(), "Non-host attempted room deletion");
            return Err(EngineError::NotHost);
        }
        self.store.remove(&self.room_id).map_err(|_| {
            EngineError::SessionNotFound {
                code: self.room_id.clone(),
            }
        })?;
        Ok(())
    }
}
