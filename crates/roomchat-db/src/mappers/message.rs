//! Message model -> entity mapper

use roomchat_core::entities::Message;
use roomchat_core::value_objects::Snowflake;

use crate::models::MessageModel;

impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: Snowflake::new(model.id),
            room_id: model.room_id.map(Snowflake::new),
            sender_id: Snowflake::new(model.sender_id),
            body: model.body,
            created_at: model.created_at,
        }
    }
}
