//! # roomchat-core
//!
//! Domain layer containing identities, rooms, messages, room naming rules,
//! broadcast event payloads, and the repository traits the infrastructure implements.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Identity, Message, Passkey, Role, Room, PASSKEY_LENGTH};
pub use error::DomainError;
pub use events::{iso_timestamp, MessagePayload, RoomCreatedPayload, RoomEvent};
pub use traits::{IdentityRepository, MessageRepository, RepoResult, RoomRepository};
pub use value_objects::{
    GroupKey, PrivatePair, RoomName, Snowflake, SnowflakeGenerator, SnowflakeParseError,
    MAX_ROOM_NAME_LENGTH, PRIVATE_ROOM_PREFIX,
};
