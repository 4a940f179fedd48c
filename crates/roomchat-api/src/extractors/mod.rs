//! Axum extractors for request handling
//!
//! Custom extractors for authentication, path ids, and JSON bodies.

mod auth;
mod path;
mod validated;

pub use auth::AuthUser;
pub use path::RoomIdPath;
pub use validated::{OptionalJson, ValidatedJson};
