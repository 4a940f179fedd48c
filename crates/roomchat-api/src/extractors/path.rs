//! Path parameter extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use roomchat_core::Snowflake;

use crate::response::ApiError;

/// Room id from a `/rooms/:room_id` path
#[derive(Debug, Clone, Copy)]
pub struct RoomIdPath(pub Snowflake);

#[async_trait]
impl<S> FromRequestParts<S> for RoomIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        raw.parse()
            .map(RoomIdPath)
            .map_err(|_| ApiError::invalid_path("Invalid room_id format"))
    }
}
