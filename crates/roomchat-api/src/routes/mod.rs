//! Route definitions
//!
//! Administration routes live under `/api`; health probes sit at the root.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, messages, rooms};
use crate::state::AppState;

/// Create the REST router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes())
        .merge(health_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_routes() -> Router<AppState> {
    Router::new().merge(room_routes()).merge(message_routes())
}

fn room_routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", post(rooms::create_room).get(rooms::list_rooms))
        .route("/rooms/:room_id", get(rooms::get_room).delete(rooms::delete_room))
        .route("/rooms/:room_id/join", post(rooms::join_room))
        .route("/rooms/:room_id/leave", post(rooms::leave_room))
        .route("/rooms/:room_id/remove_user", post(rooms::remove_user))
        .route("/rooms/:room_id/participants", get(rooms::list_participants))
}

fn message_routes() -> Router<AppState> {
    Router::new().route("/messages/:room_name", get(messages::get_history))
}
