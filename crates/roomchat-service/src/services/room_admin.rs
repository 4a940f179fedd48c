//! Room administration
//!
//! Synchronous membership changes on named rooms: passkey join, leave,
//! creator-only removal and deletion. Every failure leaves membership untouched.

use std::collections::HashMap;

use roomchat_core::{DomainError, Identity, Room, Snowflake};
use tracing::{debug, info, instrument};

use crate::dto::{CreateRoomRequest, ParticipantResponse, RoomResponse, RoomView, StatusResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::room_directory::RoomDirectory;

/// Room administration service
pub struct RoomAdminService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RoomAdminService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a named room owned by `creator`
    #[instrument(skip(self, creator, request), fields(user_id = %creator.id))]
    pub async fn create_room(
        &self,
        creator: &Identity,
        request: CreateRoomRequest,
    ) -> ServiceResult<RoomResponse> {
        let room = RoomDirectory::new(self.ctx)
            .create_named_room(&request.name, creator)
            .await?;
        self.view(room, creator.id).await
    }

    /// Named rooms the viewer has joined, newest first
    #[instrument(skip(self, viewer), fields(user_id = %viewer.id))]
    pub async fn list_rooms(&self, viewer: &Identity) -> ServiceResult<Vec<RoomResponse>> {
        let rooms = RoomDirectory::new(self.ctx).list_rooms_for(viewer.id).await?;

        let mut responses = Vec::with_capacity(rooms.len());
        for room in rooms {
            responses.push(self.view(room, viewer.id).await?);
        }
        Ok(responses)
    }

    /// Room detail; the passkey is redacted unless the viewer created the room
    #[instrument(skip(self, viewer), fields(user_id = %viewer.id))]
    pub async fn get_room(&self, room_id: Snowflake, viewer: &Identity) -> ServiceResult<RoomResponse> {
        let room = RoomDirectory::new(self.ctx).get_room(room_id).await?;
        self.view(room, viewer.id).await
    }

    /// Join with the room's passkey. Joining twice is a no-op.
    #[instrument(skip(self, identity, passkey), fields(user_id = %identity.id))]
    pub async fn join(
        &self,
        room_id: Snowflake,
        identity: &Identity,
        passkey: Option<&str>,
    ) -> ServiceResult<StatusResponse> {
        let room = RoomDirectory::new(self.ctx).get_room(room_id).await?;

        let passkey = passkey.filter(|p| !p.is_empty()).ok_or(DomainError::PasskeyRequired)?;
        if !room.passkey.matches(passkey) {
            debug!(room_id = %room.id, "Join rejected: passkey mismatch");
            return Err(DomainError::InvalidPasskey.into());
        }

        if self.ctx.room_repo().add_participant(room.id, identity.id).await? {
            info!(room_id = %room.id, "Participant joined");
        }

        Ok(StatusResponse::joined())
    }

    /// Leave a room. Leaving a room one is not in succeeds.
    ///
    /// The creator stays a participant of their own room.
    #[instrument(skip(self, identity), fields(user_id = %identity.id))]
    pub async fn leave(&self, room_id: Snowflake, identity: &Identity) -> ServiceResult<StatusResponse> {
        let room = RoomDirectory::new(self.ctx).get_room(room_id).await?;

        if room.is_creator(identity.id) {
            debug!(room_id = %room.id, "Creator leave ignored");
        } else if self
            .ctx
            .room_repo()
            .remove_participant(room.id, identity.id)
            .await?
        {
            info!(room_id = %room.id, "Participant left");
        }

        Ok(StatusResponse::left())
    }

    /// Remove `target` from a room on behalf of its creator
    #[instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn remove_participant(
        &self,
        room_id: Snowflake,
        actor: &Identity,
        target: Option<Snowflake>,
    ) -> ServiceResult<StatusResponse> {
        let room = RoomDirectory::new(self.ctx).get_room(room_id).await?;

        let target_id = target.ok_or_else(|| ServiceError::validation("user_id is required"))?;

        if !room.is_creator(actor.id) {
            return Err(DomainError::NotRoomCreator.into());
        }

        let target = self
            .ctx
            .identity_repo()
            .find_by_id(target_id)
            .await?
            .ok_or(DomainError::IdentityNotFound(target_id))?;

        if room.is_creator(target.id) {
            return Err(DomainError::CannotRemoveCreator.into());
        }

        if !self.ctx.room_repo().remove_participant(room.id, target.id).await? {
            return Err(DomainError::TargetNotParticipant(target.id).into());
        }

        info!(room_id = %room.id, user_id = %target.id, "Participant removed");

        Ok(StatusResponse::removed())
    }

    /// Delete a room on behalf of its creator.
    ///
    /// Stored messages survive without a room; sessions still joined under the
    /// room's name are closed on their next send.
    #[instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn delete_room(&self, room_id: Snowflake, actor: &Identity) -> ServiceResult<StatusResponse> {
        let room = RoomDirectory::new(self.ctx).get_room(room_id).await?;

        if !room.is_creator(actor.id) {
            return Err(DomainError::NotRoomCreator.into());
        }

        if !self.ctx.room_repo().delete(room.id).await? {
            return Err(DomainError::RoomNotFound(room.id.to_string()).into());
        }
        let orphaned = self.ctx.message_repo().detach_room(room.id).await?;

        info!(room_id = %room.id, room = %room.name, orphaned, "Room deleted");

        Ok(StatusResponse::deleted())
    }

    /// Current participants of a room
    #[instrument(skip(self))]
    pub async fn list_participants(&self, room_id: Snowflake) -> ServiceResult<Vec<ParticipantResponse>> {
        let room = RoomDirectory::new(self.ctx).get_room(room_id).await?;
        let ids = self.ctx.room_repo().list_participants(room.id).await?;

        let identities: HashMap<Snowflake, Identity> = self
            .ctx
            .identity_repo()
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|identity| (identity.id, identity))
            .collect();

        Ok(ids
            .iter()
            .filter_map(|id| identities.get(id))
            .map(ParticipantResponse::from)
            .collect())
    }

    async fn view(&self, room: Room, viewer_id: Snowflake) -> ServiceResult<RoomResponse> {
        let participants = self.ctx.room_repo().list_participants(room.id).await?;
        let creator_username = self
            .ctx
            .identity_repo()
            .find_by_id(room.creator_id)
            .await?
            .map(|identity| identity.username)
            .unwrap_or_default();

        Ok(RoomResponse::from(RoomView {
            is_joined: participants.contains(&viewer_id),
            participant_count: participants.len(),
            creator_username,
            viewer_id,
            room,
        }))
    }
}
