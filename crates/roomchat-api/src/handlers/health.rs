//! Health check handlers
//!
//! Endpoints for liveness and readiness probes.

use axum::{extract::State, http::StatusCode, Json};
use roomchat_service::dto::{HealthResponse, ReadinessResponse};

use crate::state::AppState;

/// Basic health check (liveness probe)
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness check with dependency health
///
/// GET /health/ready
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    // In-memory storage is always reachable
    let storage_healthy = match state.db_pool() {
        Some(pool) => pool.acquire().await.is_ok(),
        None => true,
    };

    let broadcast_healthy = state
        .service_context()
        .broadcaster()
        .health_check()
        .await
        .is_ok();

    let response = ReadinessResponse::ready(storage_healthy, broadcast_healthy);
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
