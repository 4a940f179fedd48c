//! Domain entities - core business objects

mod identity;
mod message;
mod room;

pub use identity::{Identity, Role};
pub use message::Message;
pub use room::{Passkey, Room, PASSKEY_LENGTH};
