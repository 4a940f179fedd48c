//! Repository traits implemented by the persistence layer

mod repositories;

pub use repositories::{IdentityRepository, MessageRepository, RepoResult, RoomRepository};
