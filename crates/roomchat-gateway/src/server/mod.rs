//! Gateway routes
//!
//! Mounted by the server binary next to the REST routes.

mod handler;
mod state;

pub use handler::{chat_handler, lobby_handler};
pub use state::GatewayState;

use axum::{routing::get, Router};

/// Create the gateway router
pub fn gateway_router() -> Router<GatewayState> {
    Router::new()
        .route("/ws/chat/:room_name", get(chat_handler))
        .route("/ws/chat/:room_name/", get(chat_handler))
        .route("/ws/rooms", get(lobby_handler))
        .route("/ws/rooms/", get(lobby_handler))
}
