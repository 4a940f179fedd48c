//! Message store
//!
//! Append-only message persistence. A message is durable before anyone can
//! see it: callers publish only the value `append` returns.

use std::collections::HashMap;

use roomchat_core::{DomainError, Identity, Message, Room, RoomName, Snowflake};
use tracing::{debug, instrument};

use crate::dto::MessageResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::room_directory::RoomDirectory;

/// Message store service
pub struct MessageStore<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageStore<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Persist a message in `room`.
    ///
    /// The body is trimmed; blank bodies fail with `EmptyMessage` and bodies
    /// longer than the configured limit with `MessageTooLong`. Neither is stored.
    #[instrument(skip(self, room, sender, body), fields(room_id = %room.id, user_id = %sender.id))]
    pub async fn append(&self, room: &Room, sender: &Identity, body: &str) -> ServiceResult<Message> {
        let body = body.trim();
        if body.is_empty() {
            return Err(DomainError::EmptyMessage.into());
        }

        let max = self.ctx.max_message_length();
        if body.chars().count() > max {
            return Err(DomainError::MessageTooLong { max }.into());
        }

        let message = Message::new(self.ctx.generate_id(), room.id, sender.id, body.to_string());
        self.ctx.message_repo().append(&message).await?;

        debug!(message_id = %message.id, "Message stored");

        Ok(message)
    }

    /// All messages of a room, oldest first
    #[instrument(skip(self))]
    pub async fn list(&self, room_id: Snowflake) -> ServiceResult<Vec<Message>> {
        Ok(self.ctx.message_repo().list_by_room(room_id).await?)
    }

    /// History of a room addressed by name, for one of its participants
    #[instrument(skip(self, viewer), fields(user_id = %viewer.id))]
    pub async fn history(&self, room_name: &str, viewer: &Identity) -> ServiceResult<Vec<MessageResponse>> {
        let name = RoomName::parse(room_name)?;
        let room = RoomDirectory::new(self.ctx).find_by_name(&name).await?;

        if !self.ctx.room_repo().is_participant(room.id, viewer.id).await? {
            return Err(DomainError::NotParticipant.into());
        }

        let messages = self.list(room.id).await?;

        let mut sender_ids: Vec<Snowflake> = messages.iter().map(|m| m.sender_id).collect();
        sender_ids.sort_unstable();
        sender_ids.dedup();

        let senders: HashMap<Snowflake, String> = self
            .ctx
            .identity_repo()
            .find_by_ids(&sender_ids)
            .await?
            .into_iter()
            .map(|identity| (identity.id, identity.username))
            .collect();

        Ok(messages
            .iter()
            .map(|message| {
                let sender = senders.get(&message.sender_id).map_or("", String::as_str);
                MessageResponse::new(message, &room.name, sender)
            })
            .collect())
    }
}
