//! Player identity captured into sessions.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Opaque stable identifier for a player.
pub type Uid = String;

/// A player's identity and display attributes.
///
/// Immutable once captured into a session: the engine never rewrites a
/// participant's profile after it lands in the room document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct PlayerProfile {
    /// Stable identifier.
    uid: Uid,
    /// Display name.
    display_name: String,
    /// Avatar reference, if the identity provider supplied one.
    avatar_url: Option<String>,
}

impl PlayerProfile {
    /// Convenience constructor for profiles without an avatar.
    pub fn named(uid: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::new(uid.into(), display_name.into(), None)
    }
}
