//! Entity to DTO mappers

use roomchat_core::{Room, Snowflake};

use super::responses::RoomResponse;

/// Room plus the viewer-dependent facts its response needs
#[derive(Debug, Clone)]
pub struct RoomView {
    pub room: Room,
    pub viewer_id: Snowflake,
    pub creator_username: String,
    pub is_joined: bool,
    pub participant_count: usize,
}

impl From<RoomView> for RoomResponse {
    fn from(view: RoomView) -> Self {
        let passkey = view.room.passkey_for(view.viewer_id).map(str::to_string);
        Self {
            id: view.room.id.to_string(),
            created_by: view.room.creator_id.to_string(),
            created_by_username: view.creator_username,
            created_at: view.room.created_at,
            name: view.room.name,
            passkey,
            is_joined: view.is_joined,
            participant_count: view.participant_count,
        }
    }
}
