//! Room entity - an addressable message scope owned by its creator

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::value_objects::{Snowflake, PRIVATE_ROOM_PREFIX};

/// Number of characters in a room passkey
pub const PASSKEY_LENGTH: usize = 6;

const PASSKEY_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Short random code gating join access to a named room
///
/// Generated once when the room is created and never regenerated.
#[derive(Clone, PartialEq, Eq)]
pub struct Passkey(String);

impl Passkey {
    /// Generate a fresh passkey from `A-Z0-9`
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let code = (0..PASSKEY_LENGTH)
            .map(|_| PASSKEY_CHARSET[rng.gen_range(0..PASSKEY_CHARSET.len())] as char)
            .collect();
        Self(code)
    }

    /// Wrap a passkey loaded from storage
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare a candidate without short-circuiting on the first mismatch
    pub fn matches(&self, candidate: &str) -> bool {
        let expected = self.0.as_bytes();
        let given = candidate.as_bytes();
        if expected.len() != given.len() {
            return false;
        }
        expected
            .iter()
            .zip(given)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

// Never print the secret in logs
impl std::fmt::Debug for Passkey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Passkey(******)")
    }
}

/// Room entity
///
/// The participant set lives in the repository; the creator is always a participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: Snowflake,
    pub name: String,
    pub creator_id: Snowflake,
    pub created_at: DateTime<Utc>,
    pub passkey: Passkey,
}

impl Room {
    /// Create a new room with a freshly generated passkey
    pub fn new(id: Snowflake, name: impl Into<String>, creator_id: Snowflake) -> Self {
        Self {
            id,
            name: name.into(),
            creator_id,
            created_at: Utc::now(),
            passkey: Passkey::generate(),
        }
    }

    #[inline]
    pub fn is_creator(&self, identity_id: Snowflake) -> bool {
        self.creator_id == identity_id
    }

    /// Check if this room uses the reserved pairwise naming scheme
    pub fn is_private(&self) -> bool {
        self.name.starts_with(PRIVATE_ROOM_PREFIX)
    }

    /// Passkey as shown to `viewer`: only the creator sees it
    pub fn passkey_for(&self, viewer: Snowflake) -> Option<&str> {
        self.is_creator(viewer).then(|| self.passkey.as_str())
    }
}
