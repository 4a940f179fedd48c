//! Message history handler

use axum::{
    extract::{Path, State},
    Json,
};
use roomchat_service::dto::MessageResponse;
use roomchat_service::MessageStore;

use crate::extractors::AuthUser;
use crate::response::ApiResult;
use crate::state::AppState;

/// Messages of a room, oldest first
///
/// GET /api/messages/{room_name}
pub async fn get_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(room_name): Path<String>,
) -> ApiResult<Json<Vec<MessageResponse>>> {
    let store = MessageStore::new(state.service_context());
    Ok(Json(store.history(&room_name, &auth.identity).await?))
}
