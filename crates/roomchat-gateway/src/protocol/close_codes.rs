//! WebSocket close codes

use serde::{Deserialize, Serialize};

/// Close codes a chat session sends when it ends the connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum CloseCode {
    /// Server shutting down
    Normal = 1000,
    /// Directory or persistence failure while joining
    InternalError = 1011,
    /// No valid token was presented at handshake
    AuthenticationRequired = 4001,
    /// Requester may not enter this room
    Forbidden = 4003,
    /// Room does not exist or the name is invalid
    RoomNotFound = 4004,
    /// No inbound frame within the idle window
    IdleTimeout = 4008,
}

impl CloseCode {
    /// Create a `CloseCode` from a raw u16 value
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1000 => Some(Self::Normal),
            1011 => Some(Self::InternalError),
            4001 => Some(Self::AuthenticationRequired),
            4003 => Some(Self::Forbidden),
            4004 => Some(Self::RoomNotFound),
            4008 => Some(Self::IdleTimeout),
            _ => None,
        }
    }

    /// Get the raw u16 value
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Check if the client should attempt to reconnect after this close code
    #[must_use]
    pub const fn should_reconnect(self) -> bool {
        matches!(self, Self::Normal | Self::InternalError | Self::IdleTimeout)
    }

    /// Get the description for this close code
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Normal => "Server shutting down",
            Self::InternalError => "Internal error",
            Self::AuthenticationRequired => "Authentication required",
            Self::Forbidden => "Forbidden",
            Self::RoomNotFound => "Room not found",
            Self::IdleTimeout => "Idle timeout",
        }
    }

    /// Get the name of this close code
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::InternalError => "InternalError",
            Self::AuthenticationRequired => "AuthenticationRequired",
            Self::Forbidden => "Forbidden",
            Self::RoomNotFound => "RoomNotFound",
            Self::IdleTimeout => "IdleTimeout",
        }
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.as_u16(), self.description())
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.as_u16()
    }
}
