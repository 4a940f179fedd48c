//! Database models - SQLx-compatible structs for PostgreSQL tables

mod identity;
mod message;
mod room;

pub use identity::IdentityModel;
pub use message::MessageModel;
pub use room::RoomModel;
