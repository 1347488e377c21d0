//! Room creation and lobby listings.

use rand::Rng;
use tracing::{debug, info, instrument, warn};

use crate::error::EngineError;
use crate::player::PlayerProfile;
use crate::session::{Session, SessionStatus};
use crate::store::{RoomStore, StoreError};

/// Alphabet for room codes, with easily-confused characters removed.
const CODE_ALPHABET: &[u8] = b"23456789ABCDEFGHJKMNPQRSTUVWXYZ";

/// Length of a room code.
const CODE_LEN: usize = 4;

/// Allocation attempts before giving up on a free code.
const MAX_CODE_ATTEMPTS: usize = 16;

/// Creates rooms with unique short codes and lists rooms awaiting a guest.
#[derive(Debug, Clone)]
pub struct RoomDirectory {
    store: RoomStore,
    board_size: usize,
}

impl RoomDirectory {
    /// Creates a directory over the given store.
    #[instrument(skip(store))]
    pub fn new(store: RoomStore, board_size: usize) -> Self {
        info!(board_size, "Creating room directory");
        Self { store, board_size }
    }

    /// Creates a new room hosted by the given player.
    ///
    /// Codes are drawn at random and retried on collision (the store's
    /// create rejects an existing key, so a collision can never clobber a
    /// live room).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RoomCodeExhausted`] if no free code is found
    /// within the attempt budget.
    #[instrument(skip(self, host), fields(host_uid = %host.uid()))]
    pub fn create_room(&self, host: PlayerProfile) -> Result<Session, EngineError> {
        for attempt in 0..MAX_CODE_ATTEMPTS {
            let code = fresh_code();
            let session = Session::new(code.clone(), host.clone(), self.board_size);

            match self.store.create(session) {
                Ok(created) => {
                    info!(room_id = %code, attempt, "Room allocated");
                    return Ok(created);
                }
                Err(StoreError::KeyExists { .. }) => {
                    debug!(room_id = %code, attempt, "Code collision, retrying");
                }
                Err(other) => return Err(other.into()),
            }
        }

        warn!(attempts = MAX_CODE_ATTEMPTS, "Room code space exhausted");
        Err(EngineError::RoomCodeExhausted)
    }

    /// Lists rooms in `waiting` status not hosted by the requesting
    /// identity, newest first.
    #[instrument(skip(self))]
    pub fn list_waiting(&self, excluding_uid: &str) -> Vec<Session> {
        let mut rooms: Vec<_> = self
            .store
            .list()
            .into_iter()
            .filter(|s| *s.status() == SessionStatus::Waiting && s.host().uid() != excluding_uid)
            .collect();
        rooms.sort_by_key(|s| std::cmp::Reverse(*s.created_at()));

        debug!(count = rooms.len(), "Listed waiting rooms");
        rooms
    }
}

/// Draws a random 4-character code.
fn fresh_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_code_shape() {
        let code = fresh_code();
        assert_eq!(code.len(), CODE_LEN);
        assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_create_room_starts_waiting() {
        let directory = RoomDirectory::new(RoomStore::new(), 10);
        let session = directory
            .create_room(PlayerProfile::named("h", "Host"))
            .expect("Create failed");
        assert_eq!(*session.status(), SessionStatus::Waiting);
        assert_eq!(session.board().area(), 100);
        assert_eq!(session.turn().as_str(), "h");
    }

    #[test]
    fn test_list_waiting_excludes_own_rooms() {
        let store = RoomStore::new();
        let directory = RoomDirectory::new(store.clone(), 10);
        let mine = directory
            .create_room(PlayerProfile::named("me", "Me"))
            .expect("Create failed");
        let theirs = directory
            .create_room(PlayerProfile::named("them", "Them"))
            .expect("Create failed");

        let listed = directory.list_waiting("me");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), theirs.id());

        let listed = directory.list_waiting("them");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), mine.id());
    }

    #[test]
    fn test_list_waiting_orders_newest_first() {
        let directory = RoomDirectory::new(RoomStore::new(), 10);
        let mut created = Vec::new();
        for i in 0..3 {
            let host = PlayerProfile::named(format!("host-{i}"), format!("Host {i}"));
            created.push(directory.create_room(host).expect("Create failed"));
            // Distinct millisecond timestamps.
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        let listed = directory.list_waiting("nobody");
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].id(), created[2].id());
        assert_eq!(listed[2].id(), created[0].id());
    }

    #[test]
    fn test_list_waiting_skips_playing_rooms() {
        let store = RoomStore::new();
        let directory = RoomDirectory::new(store.clone(), 10);
        let session = directory
            .create_room(PlayerProfile::named("h", "Host"))
            .expect("Create failed");

        store
            .update(session.id(), |s| {
                s.attach_guest(PlayerProfile::named("g", "Guest"))
            })
            .expect("Join failed");

        assert!(directory.list_waiting("someone-else").is_empty());
    }
}
