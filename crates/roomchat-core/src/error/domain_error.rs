//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Identity not found: {0}")]
    IdentityNotFound(Snowflake),

    #[error("Room not found: {0}")]
    RoomNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid room name: {0}")]
    InvalidRoomName(String),

    #[error("Message body is empty")]
    EmptyMessage,

    #[error("Message too long: max {max} characters")]
    MessageTooLong { max: usize },

    #[error("The room creator cannot be removed")]
    CannotRemoveCreator,

    #[error("Identity {0} is not a participant of this room")]
    TargetNotParticipant(Snowflake),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Passkey is required")]
    PasskeyRequired,

    #[error("Invalid passkey")]
    InvalidPasskey,

    #[error("Only the room creator can do this")]
    NotRoomCreator,

    #[error("Not a participant of this room")]
    NotParticipant,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Room name already taken: {0}")]
    RoomNameTaken(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::IdentityNotFound(_) => "UNKNOWN_IDENTITY",
            Self::RoomNotFound(_) => "UNKNOWN_ROOM",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidRoomName(_) => "INVALID_ROOM_NAME",
            Self::EmptyMessage => "EMPTY_MESSAGE",
            Self::MessageTooLong { .. } => "MESSAGE_TOO_LONG",
            Self::CannotRemoveCreator => "CANNOT_REMOVE_CREATOR",
            Self::TargetNotParticipant(_) => "NOT_A_PARTICIPANT",

            Self::PasskeyRequired => "PASSKEY_REQUIRED",
            Self::InvalidPasskey => "INVALID_PASSKEY",
            Self::NotRoomCreator => "NOT_ROOM_CREATOR",
            Self::NotParticipant => "FORBIDDEN",

            Self::RoomNameTaken(_) => "ROOM_NAME_TAKEN",

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::IdentityNotFound(_) | Self::RoomNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidRoomName(_)
                | Self::EmptyMessage
                | Self::MessageTooLong { .. }
                | Self::CannotRemoveCreator
                | Self::TargetNotParticipant(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::PasskeyRequired | Self::InvalidPasskey | Self::NotRoomCreator | Self::NotParticipant
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::RoomNameTaken(_))
    }
}
