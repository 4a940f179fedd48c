//! Gateway wire protocol
//!
//! JSON text frames in both directions and the close codes a session may end with.

mod close_codes;
mod frames;

pub use close_codes::CloseCode;
pub use frames::{FrameError, InboundFrame, OutboundFrame};
