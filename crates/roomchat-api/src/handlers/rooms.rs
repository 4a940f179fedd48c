//! Room administration handlers
//!
//! Creation, listing, passkey join, leave, and the creator-gated removal and delete.

use axum::{extract::State, Json};
use roomchat_service::dto::{
    CreateRoomRequest, JoinRoomRequest, ParticipantResponse, RemoveUserRequest, RoomResponse,
    StatusResponse,
};
use roomchat_service::RoomAdminService;

use crate::extractors::{AuthUser, OptionalJson, RoomIdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Create a named room
///
/// POST /api/rooms
pub async fn create_room(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateRoomRequest>,
) -> ApiResult<Created<Json<RoomResponse>>> {
    let service = RoomAdminService::new(state.service_context());
    let room = service.create_room(&auth.identity, request).await?;
    Ok(Created(Json(room)))
}

/// Rooms the caller has joined
///
/// GET /api/rooms
pub async fn list_rooms(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<RoomResponse>>> {
    let service = RoomAdminService::new(state.service_context());
    Ok(Json(service.list_rooms(&auth.identity).await?))
}

/// GET /api/rooms/{room_id}
pub async fn get_room(
    State(state): State<AppState>,
    auth: AuthUser,
    RoomIdPath(room_id): RoomIdPath,
) -> ApiResult<Json<RoomResponse>> {
    let service = RoomAdminService::new(state.service_context());
    Ok(Json(service.get_room(room_id, &auth.identity).await?))
}

/// Delete a room (creator only)
///
/// DELETE /api/rooms/{room_id}
pub async fn delete_room(
    State(state): State<AppState>,
    auth: AuthUser,
    RoomIdPath(room_id): RoomIdPath,
) -> ApiResult<Json<StatusResponse>> {
    let service = RoomAdminService::new(state.service_context());
    Ok(Json(service.delete_room(room_id, &auth.identity).await?))
}

/// Join with the room passkey
///
/// POST /api/rooms/{room_id}/join
pub async fn join_room(
    State(state): State<AppState>,
    auth: AuthUser,
    RoomIdPath(room_id): RoomIdPath,
    OptionalJson(request): OptionalJson<JoinRoomRequest>,
) -> ApiResult<Json<StatusResponse>> {
    let service = RoomAdminService::new(state.service_context());
    let status = service
        .join(room_id, &auth.identity, request.passkey.as_deref())
        .await?;
    Ok(Json(status))
}

/// POST /api/rooms/{room_id}/leave
pub async fn leave_room(
    State(state): State<AppState>,
    auth: AuthUser,
    RoomIdPath(room_id): RoomIdPath,
) -> ApiResult<Json<StatusResponse>> {
    let service = RoomAdminService::new(state.service_context());
    Ok(Json(service.leave(room_id, &auth.identity).await?))
}

/// Remove a participant (creator only)
///
/// POST /api/rooms/{room_id}/remove_user
pub async fn remove_user(
    State(state): State<AppState>,
    auth: AuthUser,
    RoomIdPath(room_id): RoomIdPath,
    OptionalJson(request): OptionalJson<RemoveUserRequest>,
) -> ApiResult<Json<StatusResponse>> {
    let service = RoomAdminService::new(state.service_context());
    let status = service
        .remove_participant(room_id, &auth.identity, request.user_id)
        .await?;
    Ok(Json(status))
}

/// GET /api/rooms/{room_id}/participants
pub async fn list_participants(
    State(state): State<AppState>,
    _auth: AuthUser,
    RoomIdPath(room_id): RoomIdPath,
) -> ApiResult<Json<Vec<ParticipantResponse>>> {
    let service = RoomAdminService::new(state.service_context());
    Ok(Json(service.list_participants(room_id).await?))
}
