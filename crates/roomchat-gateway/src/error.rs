//! Session error types

use roomchat_core::DomainError;
use roomchat_service::{AuthFailure, ServiceError};
use thiserror::Error;

use crate::protocol::CloseCode;

/// Why a chat session could not continue
#[derive(Debug, Error)]
pub enum SessionError {
    /// Handshake carried no usable token
    #[error("Unauthenticated: {}", .0.reason())]
    Unauthenticated(AuthFailure),

    /// Path segment is not a valid room name
    #[error("Invalid room name: {0}")]
    InvalidRoomName(#[source] DomainError),

    /// Directory or store refused the operation
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// The broadcast group went away under the session
    #[error("Broadcast group closed")]
    GroupClosed,
}

impl SessionError {
    /// Close code the client receives for this error
    pub fn close_code(&self) -> CloseCode {
        match self {
            Self::Unauthenticated(_) => CloseCode::AuthenticationRequired,
            Self::InvalidRoomName(_) => CloseCode::RoomNotFound,
            Self::Service(e) if e.is_forbidden() => CloseCode::Forbidden,
            Self::Service(e) if e.is_not_found() => CloseCode::RoomNotFound,
            Self::Service(_) | Self::GroupClosed => CloseCode::InternalError,
        }
    }
}

/// Session result type
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_code_mapping() {
        assert_eq!(
            SessionError::Unauthenticated(AuthFailure::Expired).close_code(),
            CloseCode::AuthenticationRequired
        );
        assert_eq!(
            SessionError::from(ServiceError::permission_denied("nope")).close_code(),
            CloseCode::Forbidden
        );
        assert_eq!(
            SessionError::from(ServiceError::from(DomainError::RoomNotFound("x".into()))).close_code(),
            CloseCode::RoomNotFound
        );
        assert_eq!(
            SessionError::from(ServiceError::from(DomainError::DatabaseError("down".into())))
                .close_code(),
            CloseCode::InternalError
        );
    }
}
