//! Test fixtures and data generators
//!
//! Request bodies and the response shapes the tests read back.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug, Serialize)]
pub struct CreateRoomRequest {
    pub name: String,
}

impl CreateRoomRequest {
    pub fn unique() -> Self {
        Self {
            name: format!("test-room-{}", unique_suffix()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JoinRoomRequest {
    pub passkey: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RemoveUserRequest {
    pub user_id: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct RoomResponse {
    pub id: String,
    pub name: String,
    pub created_by: String,
    pub created_by_username: String,
    pub created_at: String,
    pub passkey: Option<String>,
    pub is_joined: bool,
    pub participant_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct ParticipantResponse {
    pub id: String,
    pub username: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub room: String,
    pub sender: String,
    pub sender_id: String,
    pub body: String,
    pub timestamp: String,
}
