//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use roomchat_core::{iso_timestamp, Identity, Message, Role};
use serde::Serialize;

// ============================================================================
// Room Responses
// ============================================================================

/// Room as seen by one viewer
#[derive(Debug, Clone, Serialize)]
pub struct RoomResponse {
    pub id: String,
    pub name: String,
    pub created_by: String,
    pub created_by_username: String,
    pub created_at: DateTime<Utc>,
    /// Only the creator sees the passkey
    pub passkey: Option<String>,
    pub is_joined: bool,
    pub participant_count: usize,
}

/// Participant listing entry
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantResponse {
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl From<&Identity> for ParticipantResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.to_string(),
            username: identity.username.clone(),
            role: identity.role,
        }
    }
}

/// Outcome of a membership mutation
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn joined() -> Self {
        Self { status: "joined" }
    }

    pub fn left() -> Self {
        Self { status: "left" }
    }

    pub fn removed() -> Self {
        Self { status: "removed" }
    }

    pub fn deleted() -> Self {
        Self { status: "deleted" }
    }
}

// ============================================================================
// Message Responses
// ============================================================================

/// Stored message, same shape as the live broadcast payload minus the type tag
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub room: String,
    pub sender: String,
    pub sender_id: String,
    pub body: String,
    pub timestamp: String,
}

impl MessageResponse {
    pub fn new(message: &Message, room_name: &str, sender_username: &str) -> Self {
        Self {
            id: message.id.to_string(),
            room: room_name.to_string(),
            sender: sender_username.to_string(),
            sender_id: message.sender_id.to_string(),
            body: message.body.clone(),
            timestamp: iso_timestamp(message.created_at),
        }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub storage: String,
    pub broadcast: String,
}

impl ReadinessResponse {
    pub fn ready(storage_healthy: bool, broadcast_healthy: bool) -> Self {
        let label = |healthy: bool| if healthy { "healthy" } else { "unhealthy" }.to_string();
        Self {
            status: if storage_healthy && broadcast_healthy { "ready" } else { "not_ready" }
                .to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                storage: label(storage_healthy),
                broadcast: label(broadcast_healthy),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomchat_core::Snowflake;

    #[test]
    fn test_participant_response() {
        let identity = Identity::new(7, "Bob", Role::Viewer);
        let json = serde_json::to_value(ParticipantResponse::from(&identity)).unwrap();
        assert_eq!(json["id"], "7");
        assert_eq!(json["username"], "Bob");
        assert_eq!(json["role"], "viewer");
    }

    #[test]
    fn test_message_response() {
        let message = Message::new(Snowflake::new(42), Snowflake::new(1), Snowflake::new(3), "hi".into());
        let response = MessageResponse::new(&message, "room_3_7", "Alice");
        assert_eq!(response.id, "42");
        assert_eq!(response.sender_id, "3");
        assert!(response.timestamp.ends_with('Z'));
    }

    #[test]
    fn test_status_response() {
        let json = serde_json::to_value(StatusResponse::joined()).unwrap();
        assert_eq!(json, serde_json::json!({"status": "joined"}));
    }

    #[test]
    fn test_readiness_response() {
        assert!(ReadinessResponse::ready(true, true).is_ready());

        let degraded = ReadinessResponse::ready(true, false);
        assert!(!degraded.is_ready());
        assert_eq!(degraded.checks.broadcast, "unhealthy");
    }
}
