//! Room events - payloads published to broadcast groups
//!
//! Events are serialized once by the publisher and delivered verbatim to every subscriber.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Identity, Message, Room};
use crate::value_objects::Snowflake;

/// Everything a broadcast group can carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomEvent {
    /// A persisted chat message
    Message(MessagePayload),
    /// A named room was provisioned (lobby group only)
    RoomCreated(RoomCreatedPayload),
}

impl RoomEvent {
    /// Serialize for the wire
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Outbound message payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub id: Snowflake,
    pub room: String,
    pub sender: String,
    pub sender_id: Snowflake,
    pub body: String,
    /// RFC 3339 UTC server timestamp
    pub timestamp: String,
}

impl MessagePayload {
    pub fn new(message: &Message, room_name: &str, sender: &Identity) -> Self {
        Self {
            id: message.id,
            room: room_name.to_string(),
            sender: sender.username.clone(),
            sender_id: sender.id,
            body: message.body.clone(),
            timestamp: iso_timestamp(message.created_at),
        }
    }
}

/// Lobby notification for a newly created named room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCreatedPayload {
    pub id: Snowflake,
    pub name: String,
    pub created_by: Snowflake,
}

impl From<&Room> for RoomCreatedPayload {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id,
            name: room.name.clone(),
            created_by: room.creator_id,
        }
    }
}

/// Format a timestamp the way every outbound payload does
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}
