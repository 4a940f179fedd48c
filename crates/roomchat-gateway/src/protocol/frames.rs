//! Text frame payloads

use serde::{Deserialize, Serialize};

/// Frame sent by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundFrame {
    /// Post a message to the session's room
    SendMessage { body: String },
    /// Application-level keepalive
    Ping,
}

/// Error parsing an inbound frame
#[derive(Debug, thiserror::Error)]
#[error("unrecognized frame: {0}")]
pub struct FrameError(#[from] serde_json::Error);

// Older clients send `{"message": "..."}` without a type tag
#[derive(Deserialize)]
#[serde(untagged)]
enum WireFrame {
    Tagged(InboundFrame),
    Legacy { message: String },
}

impl InboundFrame {
    /// Parse a text frame
    ///
    /// # Errors
    /// Returns `FrameError` if the text is neither a tagged frame nor a legacy message
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        Ok(match serde_json::from_str::<WireFrame>(text)? {
            WireFrame::Tagged(frame) => frame,
            WireFrame::Legacy { message } => Self::SendMessage { body: message },
        })
    }
}

/// Control frame sent by the server; room events are forwarded pre-serialized
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundFrame {
    Pong,
}

impl OutboundFrame {
    /// Serialize for the wire
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
