//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation (Postgres or in-memory).

use async_trait::async_trait;

use crate::entities::{Identity, Message, Room};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Identity Repository
// ============================================================================

/// Read model of the account collaborator's identities
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Find identity by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Identity>>;

    /// Find several identities; unknown ids are skipped
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Identity>>;

    /// Insert or refresh an identity record
    async fn upsert(&self, identity: &Identity) -> RepoResult<()>;
}

// ============================================================================
// Room Repository
// ============================================================================

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Find room by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Room>>;

    /// Find room by its unique name
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Room>>;

    /// Insert a room and its creator as first participant.
    ///
    /// Fails with `RoomNameTaken` if the name exists.
    async fn create(&self, room: &Room) -> RepoResult<()>;

    /// Insert a room (and its creator as participant) unless one with the same
    /// name exists, then return the stored row.
    ///
    /// Concurrent callers with the same name all receive the same room.
    async fn get_or_create(&self, room: &Room) -> RepoResult<Room>;

    /// Delete a room with its participant rows; returns `false` when absent
    async fn delete(&self, id: Snowflake) -> RepoResult<bool>;

    /// Add a participant; returns `false` when already present
    async fn add_participant(&self, room_id: Snowflake, identity_id: Snowflake) -> RepoResult<bool>;

    /// Remove a participant; returns `false` when not present
    async fn remove_participant(&self, room_id: Snowflake, identity_id: Snowflake)
        -> RepoResult<bool>;

    /// Check participant membership
    async fn is_participant(&self, room_id: Snowflake, identity_id: Snowflake) -> RepoResult<bool>;

    /// Participant ids in join order
    async fn list_participants(&self, room_id: Snowflake) -> RepoResult<Vec<Snowflake>>;

    /// Rooms an identity participates in, newest first
    async fn list_for_participant(&self, identity_id: Snowflake) -> RepoResult<Vec<Room>>;
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Durably store a message
    async fn append(&self, message: &Message) -> RepoResult<()>;

    /// All messages of a room, ascending by `(created_at, id)`
    async fn list_by_room(&self, room_id: Snowflake) -> RepoResult<Vec<Message>>;

    /// Orphan every message of a room, keeping the rows with no room.
    /// Returns the number of messages detached.
    async fn detach_room(&self, room_id: Snowflake) -> RepoResult<u64>;
}
