//! Room names - free-form shared rooms and deterministic pairwise rooms
//!
//! A pairwise room between identities `a` and `b` is always named
//! `room_<min>_<max>`, so both parties address the same room regardless
//! of which one connects first.

use std::fmt;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Prefix reserved for pairwise room names
pub const PRIVATE_ROOM_PREFIX: &str = "room_";

/// Maximum room name length in characters
pub const MAX_ROOM_NAME_LENGTH: usize = 255;

/// Two distinct identities sharing a private room, stored in ascending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrivatePair {
    low: Snowflake,
    high: Snowflake,
}

impl PrivatePair {
    /// Build a pair from either ordering; `None` when both ids are equal
    pub fn new(a: Snowflake, b: Snowflake) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Lower id; becomes the room creator
    pub fn low(&self) -> Snowflake {
        self.low
    }

    pub fn high(&self) -> Snowflake {
        self.high
    }

    pub fn contains(&self, id: Snowflake) -> bool {
        self.low == id || self.high == id
    }

    pub fn members(&self) -> [Snowflake; 2] {
        [self.low, self.high]
    }

    /// `room_<min>_<max>`
    pub fn canonical_name(&self) -> String {
        format!("{PRIVATE_ROOM_PREFIX}{}_{}", self.low, self.high)
    }
}

/// A parsed room name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoomName {
    /// `room_<a>_<b>` with two distinct numeric ids
    Private(PrivatePair),
    /// Any other name; provisioned through the administration API
    Named(String),
}

impl RoomName {
    /// Classify a raw name taken from a path segment
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidRoomName("name cannot be empty".into()));
        }
        if name.chars().count() > MAX_ROOM_NAME_LENGTH {
            return Err(DomainError::InvalidRoomName(format!(
                "name exceeds {MAX_ROOM_NAME_LENGTH} characters"
            )));
        }

        if let Some((a, b)) = name
            .strip_prefix(PRIVATE_ROOM_PREFIX)
            .and_then(|rest| rest.split_once('_'))
        {
            if let (Some(a), Some(b)) = (parse_id(a), parse_id(b)) {
                return PrivatePair::new(a, b).map(Self::Private).ok_or_else(|| {
                    DomainError::InvalidRoomName(
                        "a private room needs two distinct participants".into(),
                    )
                });
            }
        }

        Ok(Self::Named(name.to_string()))
    }

    /// Pairwise room for two identities
    pub fn private(a: Snowflake, b: Snowflake) -> Option<Self> {
        PrivatePair::new(a, b).map(Self::Private)
    }

    /// Name under which the room is stored
    pub fn canonical(&self) -> String {
        match self {
            Self::Private(pair) => pair.canonical_name(),
            Self::Named(name) => name.clone(),
        }
    }

    pub fn as_private(&self) -> Option<&PrivatePair> {
        match self {
            Self::Private(pair) => Some(pair),
            Self::Named(_) => None,
        }
    }

    pub fn is_private(&self) -> bool {
        matches!(self, Self::Private(_))
    }

    /// Named rooms may not squat on the pairwise prefix
    pub fn is_reserved(&self) -> bool {
        match self {
            Self::Private(_) => true,
            Self::Named(name) => name.starts_with(PRIVATE_ROOM_PREFIX),
        }
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Private(pair) => write!(f, "{PRIVATE_ROOM_PREFIX}{}_{}", pair.low, pair.high),
            Self::Named(name) => f.write_str(name),
        }
    }
}

fn parse_id(part: &str) -> Option<Snowflake> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse::<i64>().ok().map(Snowflake::new)
}
