//! Events fanned out to broadcast group subscribers

mod room_event;

pub use room_event::{iso_timestamp, MessagePayload, RoomCreatedPayload, RoomEvent};
