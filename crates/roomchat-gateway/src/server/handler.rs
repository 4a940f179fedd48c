//! WebSocket upgrade handlers

use axum::{
    extract::{Path, Query, State, WebSocketUpgrade},
    response::IntoResponse,
};
use futures_util::StreamExt;

use crate::gatekeeper::{ConnectQuery, Gatekeeper};
use crate::lobby::run_lobby;
use crate::server::GatewayState;

/// `GET /ws/chat/{room_name}?token=...`
///
/// The token is resolved before the upgrade completes; the session decides
/// what to do with an anonymous connection.
pub async fn chat_handler(
    State(state): State<GatewayState>,
    Path(room_name): Path<String>,
    Query(query): Query<ConnectQuery>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let connection = Gatekeeper::new(state.service_context())
        .admit(room_name, query.token.as_deref())
        .await;
    let session = state.session(connection);

    ws.on_upgrade(move |socket| async move {
        let (sink, stream) = socket.split();
        let final_state = session.run(sink, stream).await;
        tracing::trace!(state = ?final_state, "Chat session finished");
    })
}

/// `GET /ws/rooms?token=...`
pub async fn lobby_handler(
    State(state): State<GatewayState>,
    Query(query): Query<ConnectQuery>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let connection = Gatekeeper::new(state.service_context())
        .admit("rooms", query.token.as_deref())
        .await;
    let ctx = state.service_context().clone();
    let shutdown = state.shutdown_signal();

    ws.on_upgrade(move |socket| async move {
        let (sink, stream) = socket.split();
        run_lobby(ctx, connection, shutdown, sink, stream).await;
    })
}
