//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize`; bodies with field rules also implement `Validate`.

use roomchat_core::Snowflake;
use serde::Deserialize;
use validator::Validate;

/// Create a named room
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 255, message = "Room name must be 1-255 characters"))]
    pub name: String,
}

/// Join a named room; a missing passkey is rejected by the service, not the extractor
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JoinRoomRequest {
    #[serde(default)]
    pub passkey: Option<String>,
}

/// Remove a participant; `user_id` may be a JSON string or number
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoveUserRequest {
    #[serde(default)]
    pub user_id: Option<Snowflake>,
}
