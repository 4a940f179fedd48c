//! Identity resolver
//!
//! Turns a bearer token into an [`Identity`]. Every failure is a distinct
//! [`AuthFailure`] so logs can tell them apart, while callers treat them all
//! as "unauthenticated".

use roomchat_common::AppError;
use roomchat_core::Identity;
use tracing::{debug, instrument, warn};

use super::context::ServiceContext;

/// Why a token did not resolve to an identity
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    #[error("no token supplied")]
    Absent,

    #[error("token expired")]
    Expired,

    #[error("token malformed")]
    Malformed,

    #[error("token subject is not a known identity")]
    UnknownSubject,

    #[error("identity lookup failed")]
    LookupFailed,
}

impl AuthFailure {
    /// Stable label for structured logs
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Expired => "expired",
            Self::Malformed => "malformed",
            Self::UnknownSubject => "unknown_subject",
            Self::LookupFailed => "lookup_failed",
        }
    }
}

/// Resolves bearer tokens against the token service and the identity repository
pub struct IdentityResolver<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve a token to the identity it names.
    ///
    /// Username and role come from the identity repository, not from the claims.
    #[instrument(skip_all)]
    pub async fn resolve(&self, token: Option<&str>) -> Result<Identity, AuthFailure> {
        let token = token.map(str::trim).filter(|t| !t.is_empty()).ok_or(AuthFailure::Absent)?;

        let claims = self
            .ctx
            .jwt_service()
            .validate_access_token(token)
            .map_err(|e| match e {
                AppError::TokenExpired => AuthFailure::Expired,
                _ => AuthFailure::Malformed,
            })?;

        let identity_id = claims.identity_id().map_err(|_| AuthFailure::Malformed)?;

        match self.ctx.identity_repo().find_by_id(identity_id).await {
            Ok(Some(identity)) => {
                debug!(user_id = %identity.id, "Token resolved");
                Ok(identity)
            }
            Ok(None) => Err(AuthFailure::UnknownSubject),
            Err(e) => {
                warn!(user_id = %identity_id, error = %e, "Identity lookup failed during token resolution");
                Err(AuthFailure::LookupFailed)
            }
        }
    }
}
