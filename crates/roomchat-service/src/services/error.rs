//! Service layer error type

use roomchat_common::AppError;
use roomchat_core::DomainError;
use thiserror::Error;

/// Why a directory, store, or administration call was refused
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Domain rule violation or repository failure
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Caller may not act on the target
    #[error("Permission denied: {reason}")]
    PermissionDenied { reason: String },

    /// Input the operation needs is missing or unusable
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ServiceError {
    pub fn permission_denied(reason: impl Into<String>) -> Self {
        Self::PermissionDenied {
            reason: reason.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// HTTP status the REST surface answers with
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => AppError::status_for_domain(e),
            Self::PermissionDenied { .. } => 403,
            Self::Validation(_) => 400,
        }
    }

    /// Machine-readable code for the error envelope
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::PermissionDenied { .. } => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }

    /// Whether the caller lacks rights, as opposed to the target being absent or invalid
    pub fn is_forbidden(&self) -> bool {
        self.status_code() == 403
    }

    /// Whether the addressed resource does not exist
    pub fn is_not_found(&self) -> bool {
        self.status_code() == 404
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
