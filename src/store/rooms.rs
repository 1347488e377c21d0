//! In-memory room document store with atomic transactions and push
//! subscriptions.
//!
//! Stands in for the externally-hosted store the engine assumes: a
//! key-value document store offering atomic read-modify-write per key and
//! full-value push notification on every change. A remote backend must
//! preserve the same guarantees; the engine never relies on anything
//! beyond them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::error::EngineError;
use crate::session::{RoomId, Session};
use crate::store::StoreError;

/// One stored room plus its change publisher.
#[derive(Debug)]
struct RoomSlot {
    session: Session,
    publisher: watch::Sender<Option<Session>>,
}

/// Shared store of room documents keyed by room code.
///
/// Every mutation is a full read-modify-write performed while holding the
/// map lock, which is what makes the guest-join conditional commit and the
/// terminal-move single-write guarantees hold. Subscribers receive the full
/// current value on every change and `None` when the room is deleted.
#[derive(Debug, Clone)]
pub struct RoomStore {
    rooms: Arc<Mutex<HashMap<RoomId, RoomSlot>>>,
}

impl RoomStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating room store");
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Creates a document at the session's room code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::KeyExists`] if the code is already taken.
    #[instrument(skip(self, session), fields(room_id = %session.id()))]
    pub fn create(&self, session: Session) -> Result<Session, StoreError> {
        let mut rooms = self.rooms.lock().unwrap();
        let key = session.id().clone();

        if rooms.contains_key(&key) {
            warn!(room_id = %key, "Room code collision");
            return Err(StoreError::KeyExists { key });
        }

        let (publisher, _) = watch::channel(Some(session.clone()));
        rooms.insert(
            key.clone(),
            RoomSlot {
                session: session.clone(),
                publisher,
            },
        );

        info!(room_id = %key, "Room created");
        Ok(session)
    }

    /// Reads the current value of a room document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Missing`] if no room exists at the code.
    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> Result<Session, StoreError> {
        let rooms = self.rooms.lock().unwrap();
        rooms
            .get(id)
            .map(|slot| slot.session.clone())
            .ok_or_else(|| {
                debug!(room_id = id, "Room not found");
                StoreError::Missing { key: id.to_string() }
            })
    }

    /// Atomically transforms a room document.
    ///
    /// The transition closure runs while the map lock is held, so the value
    /// it sees is the value the commit replaces — a check-then-write pair
    /// cannot interleave with a competitor. If the closure errors, nothing
    /// is written and subscribers see no change.
    #[instrument(skip(self, transition))]
    pub fn update(
        &self,
        id: &str,
        transition: impl FnOnce(&Session) -> Result<Session, EngineError>,
    ) -> Result<Session, EngineError> {
        let mut rooms = self.rooms.lock().unwrap();
        let slot = rooms.get_mut(id).ok_or_else(|| {
            debug!(room_id = id, "Room not found");
            EngineError::Store(StoreError::Missing { key: id.to_string() })
        })?;

        let next = transition(&slot.session)?;
        slot.session = next.clone();
        slot.publisher.send_replace(Some(next.clone()));

        debug!(room_id = id, status = %next.status(), "Room updated");
        Ok(next)
    }

    /// Deletes a room document, notifying subscribers with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Missing`] if no room exists at the code.
    #[instrument(skip(self))]
    pub fn remove(&self, id: &str) -> Result<(), StoreError> {
        let mut rooms = self.rooms.lock().unwrap();
        let slot = rooms.remove(id).ok_or_else(|| StoreError::Missing {
            key: id.to_string(),
        })?;

        slot.publisher.send_replace(None);
        info!(room_id = id, "Room removed");
        Ok(())
    }

    /// Subscribes to a room document.
    ///
    /// The receiver holds the full current value; it flips to `None` when
    /// the room is deleted, which subscribers must treat as the room having
    /// ended.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Missing`] if no room exists at the code.
    #[instrument(skip(self))]
    pub fn subscribe(&self, id: &str) -> Result<watch::Receiver<Option<Session>>, StoreError> {
        let rooms = self.rooms.lock().unwrap();
        rooms
            .get(id)
            .map(|slot| slot.publisher.subscribe())
            .ok_or_else(|| StoreError::Missing {
                key: id.to_string(),
            })
    }

    /// Snapshot of all room documents.
    #[instrument(skip(self))]
    pub fn list(&self) -> Vec<Session> {
        let rooms = self.rooms.lock().unwrap();
        let sessions: Vec<_> = rooms.values().map(|slot| slot.session.clone()).collect();
        debug!(count = sessions.len(), "Listed rooms");
        sessions
    }
}

impl Default for RoomStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerProfile;

    fn store_with_room(code: &str) -> RoomStore {
        let store = RoomStore::new();
        let session = Session::new(code.to_string(), PlayerProfile::named("h", "Host"), 10);
        store.create(session).expect("Create failed");
        store
    }

    #[test]
    fn test_create_duplicate_key_rejected() {
        let store = store_with_room("AAAA");
        let session = Session::new("AAAA".to_string(), PlayerProfile::named("h2", "Other"), 10);
        let err = store.create(session).unwrap_err();
        assert_eq!(
            err,
            StoreError::KeyExists {
                key: "AAAA".to_string()
            }
        );
    }

    #[test]
    fn test_update_publishes_to_subscribers() {
        let store = store_with_room("AAAA");
        let rx = store.subscribe("AAAA").expect("Subscribe failed");

        store
            .update("AAAA", |s| s.attach_guest(PlayerProfile::named("g", "Guest")))
            .expect("Update failed");

        let seen = rx.borrow();
        let session = seen.as_ref().expect("Room should exist");
        assert!(session.guest().is_some());
    }

    #[test]
    fn test_failed_transition_writes_nothing() {
        let store = store_with_room("AAAA");
        let before = store.get("AAAA").expect("Get failed");

        let result = store.update("AAAA", |s| s.submit_move("h", 0));
        assert!(result.is_err());
        assert_eq!(store.get("AAAA").expect("Get failed"), before);
    }

    #[test]
    fn test_remove_notifies_with_none() {
        let store = store_with_room("AAAA");
        let rx = store.subscribe("AAAA").expect("Subscribe failed");

        store.remove("AAAA").expect("Remove failed");

        assert!(rx.borrow().is_none());
        assert!(store.get("AAAA").is_err());
    }

    #[test]
    fn test_join_race_commits_exactly_one_guest() {
        let store = store_with_room("AAAA");

        let first = store.update("AAAA", |s| {
            s.attach_guest(PlayerProfile::named("g1", "First"))
        });
        let second = store.update("AAAA", |s| {
            s.attach_guest(PlayerProfile::named("g2", "Second"))
        });

        assert!(first.is_ok());
        assert_eq!(second.unwrap_err(), EngineError::GuestSlotTaken);

        let session = store.get("AAAA").expect("Get failed");
        assert_eq!(
            session.guest().as_ref().map(|g| g.uid().as_str()),
            Some("g1")
        );
    }
}
