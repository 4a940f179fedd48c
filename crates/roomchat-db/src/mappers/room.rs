//! Room model -> entity mapper

use roomchat_core::entities::{Passkey, Room};
use roomchat_core::value_objects::Snowflake;

use crate::models::RoomModel;

impl From<RoomModel> for Room {
    fn from(model: RoomModel) -> Self {
        Room {
            id: Snowflake::new(model.id),
            name: model.name,
            creator_id: Snowflake::new(model.created_by),
            created_at: model.created_at,
            // CHAR(6) pads with spaces if a shorter value was ever stored
            passkey: Passkey::from_stored(model.passkey.trim_end()),
        }
    }
}
