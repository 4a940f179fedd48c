//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in roomchat-core.

mod error;
mod identity;
mod message;
mod room;

pub use identity::PgIdentityRepository;
pub use message::PgMessageRepository;
pub use room::PgRoomRepository;
