//! Room directory
//!
//! Provisions rooms and reconciles membership. Private rooms are created on
//! first contact between their two members; named rooms only through the
//! administration surface.

use roomchat_core::{
    DomainError, GroupKey, Identity, PrivatePair, Room, RoomCreatedPayload, RoomEvent, RoomName,
    Snowflake,
};
use tracing::{debug, info, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Room directory service
pub struct RoomDirectory<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RoomDirectory<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Room a session joins when it connects under `name`.
    ///
    /// Private names get-or-create the canonical pair room with the lower id as
    /// creator and add both members. Named rooms get-or-create with `requester`
    /// as creator and add `requester`; a named room under the private prefix
    /// can never exist and is reported as not found.
    #[instrument(skip(self, requester), fields(user_id = %requester.id, room = %name))]
    pub async fn ensure_room(&self, name: &RoomName, requester: &Identity) -> ServiceResult<Room> {
        match name {
            RoomName::Private(pair) => {
                if !pair.contains(requester.id) {
                    return Err(ServiceError::permission_denied(
                        "requester is not a member of this private room",
                    ));
                }
                self.provision_private(pair).await
            }
            RoomName::Named(raw) if name.is_reserved() => {
                debug!(room = %raw, "Reserved prefix on a named room");
                Err(DomainError::RoomNotFound(raw.clone()).into())
            }
            RoomName::Named(raw) => {
                let candidate = Room::new(self.ctx.generate_id(), raw.as_str(), requester.id);
                let room = self.ctx.room_repo().get_or_create(&candidate).await?;
                self.ctx
                    .room_repo()
                    .add_participant(room.id, requester.id)
                    .await?;
                Ok(room)
            }
        }
    }

    /// Room a message is persisted against.
    ///
    /// Private rooms are autovivified; named rooms must already exist.
    #[instrument(skip(self), fields(room = %name))]
    pub async fn resolve_for_send(&self, name: &RoomName) -> ServiceResult<Room> {
        match name {
            RoomName::Private(pair) => self.provision_private(pair).await,
            RoomName::Named(raw) => self
                .ctx
                .room_repo()
                .find_by_name(raw)
                .await?
                .ok_or_else(|| DomainError::RoomNotFound(raw.clone()).into()),
        }
    }

    /// Provision a named room through the administration surface.
    ///
    /// The creator becomes the first participant and the lobby group is told
    /// about the new room.
    #[instrument(skip(self, creator), fields(user_id = %creator.id))]
    pub async fn create_named_room(&self, raw_name: &str, creator: &Identity) -> ServiceResult<Room> {
        let name = RoomName::parse(raw_name)?;
        if name.is_private() || name.is_reserved() {
            return Err(DomainError::InvalidRoomName(format!(
                "names starting with '{}' are reserved for private rooms",
                roomchat_core::PRIVATE_ROOM_PREFIX
            ))
            .into());
        }

        let room = Room::new(self.ctx.generate_id(), name.canonical(), creator.id);
        self.ctx.room_repo().create(&room).await?;

        info!(room_id = %room.id, room = %room.name, "Named room created");

        let event = RoomEvent::RoomCreated(RoomCreatedPayload::from(&room));
        if let Err(e) = self.ctx.broadcaster().publish(&GroupKey::lobby(), &event).await {
            warn!(room_id = %room.id, error = %e, "Failed to announce room creation");
        }

        Ok(room)
    }

    /// Named rooms `identity` participates in, newest first
    #[instrument(skip(self))]
    pub async fn list_rooms_for(&self, identity_id: Snowflake) -> ServiceResult<Vec<Room>> {
        let rooms = self.ctx.room_repo().list_for_participant(identity_id).await?;
        Ok(rooms.into_iter().filter(|room| !room.is_private()).collect())
    }

    /// Look up a room by id
    #[instrument(skip(self))]
    pub async fn get_room(&self, room_id: Snowflake) -> ServiceResult<Room> {
        self.ctx
            .room_repo()
            .find_by_id(room_id)
            .await?
            .ok_or_else(|| DomainError::RoomNotFound(room_id.to_string()).into())
    }

    /// Look up a room by its (possibly non-canonical) name
    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &RoomName) -> ServiceResult<Room> {
        let canonical = name.canonical();
        self.ctx
            .room_repo()
            .find_by_name(&canonical)
            .await?
            .ok_or_else(|| DomainError::RoomNotFound(canonical).into())
    }

    async fn provision_private(&self, pair: &PrivatePair) -> ServiceResult<Room> {
        for member in pair.members() {
            if self.ctx.identity_repo().find_by_id(member).await?.is_none() {
                return Err(DomainError::IdentityNotFound(member).into());
            }
        }

        let candidate = Room::new(self.ctx.generate_id(), pair.canonical_name(), pair.low());
        let room = self.ctx.room_repo().get_or_create(&candidate).await?;

        for member in pair.members() {
            if self.ctx.room_repo().add_participant(room.id, member).await? {
                debug!(room_id = %room.id, user_id = %member, "Participant added");
            }
        }

        Ok(room)
    }
}
