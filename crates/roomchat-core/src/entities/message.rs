//! Message entity - an immutable chat message

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Message entity
///
/// `room_id` is `None` only for legacy rows whose room no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub room_id: Option<Snowflake>,
    pub sender_id: Snowflake,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped with the current server time
    pub fn new(id: Snowflake, room_id: Snowflake, sender_id: Snowflake, body: String) -> Self {
        Self {
            id,
            room_id: Some(room_id),
            sender_id,
            body,
            created_at: Utc::now(),
        }
    }
}
