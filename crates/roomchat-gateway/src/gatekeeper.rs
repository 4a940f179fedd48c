//! Connection gatekeeper
//!
//! Runs before the websocket upgrade completes. The token comes from the
//! query string because browser websocket clients cannot set headers on the
//! upgrade request.

use roomchat_core::Identity;
use roomchat_service::{AuthFailure, IdentityResolver, ServiceContext};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

/// Query parameters of a websocket upgrade request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectQuery {
    pub token: Option<String>,
}

/// Who is on the other end of a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionIdentity {
    Authenticated(Identity),
    /// Token missing or unresolvable; the reason is kept for diagnostics only
    Anonymous(AuthFailure),
}

impl ConnectionIdentity {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Anonymous(_) => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Everything known about a connection before its session starts
#[derive(Debug, Clone)]
pub struct ConnectionContext {
    pub connection_id: Uuid,
    pub identity: ConnectionIdentity,
    /// Raw `room_name` path segment
    pub room_name: String,
}

/// Binds the outcome of token resolution into a [`ConnectionContext`]
pub struct Gatekeeper<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> Gatekeeper<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve the token exactly once. Never fails: bad tokens yield an anonymous context.
    pub async fn admit(&self, room_name: impl Into<String>, token: Option<&str>) -> ConnectionContext {
        let connection_id = Uuid::new_v4();
        let room_name = room_name.into();

        let identity = match IdentityResolver::new(self.ctx).resolve(token).await {
            Ok(identity) => {
                debug!(%connection_id, user_id = %identity.id, room = %room_name, "Connection authenticated");
                ConnectionIdentity::Authenticated(identity)
            }
            Err(failure) => {
                info!(%connection_id, room = %room_name, reason = failure.reason(), "Connection unauthenticated");
                ConnectionIdentity::Anonymous(failure)
            }
        };

        ConnectionContext {
            connection_id,
            identity,
            room_name,
        }
    }
}
