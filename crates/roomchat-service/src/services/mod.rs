//! Business logic services
//!
//! Services borrow a [`ServiceContext`] and are cheap to construct per call.

pub mod context;
pub mod error;
pub mod identity;
pub mod message_store;
pub mod room_admin;
pub mod room_directory;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use identity::{AuthFailure, IdentityResolver};
pub use message_store::MessageStore;
pub use room_admin::RoomAdminService;
pub use room_directory::RoomDirectory;

#[cfg(test)]
pub(crate) mod test_support;
