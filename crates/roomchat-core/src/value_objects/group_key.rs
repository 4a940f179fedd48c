//! Broadcast group keys

use std::fmt;

use crate::value_objects::RoomName;

/// Key under which sessions subscribe to a broadcast group
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey(String);

impl GroupKey {
    const ROOM_PREFIX: &'static str = "chat_";
    const LOBBY: &'static str = "rooms";

    /// Group for one room; stable across both orderings of a private pair
    pub fn room(name: &RoomName) -> Self {
        Self(format!("{}{}", Self::ROOM_PREFIX, name.canonical()))
    }

    /// Group receiving room directory notifications
    pub fn lobby() -> Self {
        Self(Self::LOBBY.to_string())
    }

    /// Rebuild a key received from an external substrate
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
