//! Server setup and initialization
//!
//! Wires storage, broadcast, and services together and serves the REST and
//! websocket routes from one listener.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use roomchat_common::{AppConfig, AppError, BroadcastBackend, JwtService, StorageBackend};
use roomchat_core::{IdentityRepository, MessageRepository, RoomRepository, SnowflakeGenerator};
use roomchat_db::{
    create_pool, run_migrations, MemoryIdentityRepository, MemoryMessageRepository,
    MemoryRoomRepository, PgIdentityRepository, PgMessageRepository, PgPool, PgRoomRepository,
};
use roomchat_gateway::{gateway_router, GatewayState};
use roomchat_pubsub::{BroadcastHub, Broadcaster, Publisher, RedisPool, RedisPoolConfig, RedisRelay};
use roomchat_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

struct Repositories {
    identities: Arc<dyn IdentityRepository>,
    rooms: Arc<dyn RoomRepository>,
    messages: Arc<dyn MessageRepository>,
    pool: Option<PgPool>,
}

async fn open_storage(storage: &StorageBackend) -> Result<Repositories, AppError> {
    match storage {
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            Ok(Repositories {
                identities: Arc::new(MemoryIdentityRepository::new()),
                rooms: Arc::new(MemoryRoomRepository::new()),
                messages: Arc::new(MemoryMessageRepository::new()),
                pool: None,
            })
        }
        StorageBackend::Postgres(db_config) => {
            info!("Connecting to PostgreSQL...");
            let pool = create_pool(db_config)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            if db_config.run_migrations {
                run_migrations(&pool)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
            }
            info!("PostgreSQL connection established");

            Ok(Repositories {
                identities: Arc::new(PgIdentityRepository::new(pool.clone())),
                rooms: Arc::new(PgRoomRepository::new(pool.clone())),
                messages: Arc::new(PgMessageRepository::new(pool.clone())),
                pool: Some(pool),
            })
        }
    }
}

fn open_broadcaster(config: &AppConfig) -> Result<Broadcaster, AppError> {
    let hub = BroadcastHub::new(config.broadcast.channel_capacity);

    match &config.broadcast.backend {
        BroadcastBackend::Local => Ok(Broadcaster::local(hub)),
        BroadcastBackend::Redis(redis_config) => {
            let pool = RedisPool::new(RedisPoolConfig::from(redis_config))
                .map_err(|e| AppError::Cache(e.to_string()))?;
            // Detached; reconnects on its own for the life of the process
            let _relay = RedisRelay::spawn(redis_config.url.clone(), hub.clone());
            info!("Broadcasting through Redis");
            Ok(Broadcaster::redis(hub, Publisher::new(pool)))
        }
    }
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let repositories = open_storage(&config.storage).await?;
    let broadcaster = open_broadcaster(&config)?;

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
    ));
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.worker_id));

    let service_context = ServiceContextBuilder::new()
        .identity_repo(repositories.identities)
        .room_repo(repositories.rooms)
        .message_repo(repositories.messages)
        .broadcaster(broadcaster)
        .jwt_service(jwt_service)
        .snowflake_generator(snowflake_generator)
        .max_message_length(config.gateway.max_message_length)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config, repositories.pool))
}

/// Gateway state sharing the REST state's services
pub fn create_gateway_state(state: &AppState) -> GatewayState {
    GatewayState::new(
        state.service_context().clone(),
        state.config().gateway.idle_timeout,
    )
}

/// Build the complete application with all routes and middleware
pub fn create_app(state: AppState, gateway: GatewayState) -> Router {
    let config = state.config().clone();
    let router = create_router()
        .with_state(state)
        .merge(gateway_router().with_state(gateway));

    apply_middleware(
        router,
        config.server.request_timeout,
        &config.cors,
        &config.rate_limit,
    )
}

/// Serve on an already bound listener until `shutdown` resolves
///
/// Open websocket sessions are told to close before the listener stops.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let gateway = create_gateway_state(&state);
    let app = create_app(state, gateway.clone());

    if let Ok(addr) = listener.local_addr() {
        info!("Server listening on http://{addr}");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            gateway.shutdown();
        })
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .server
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid server address: {e}")))?;

    let state = create_app_state(config).await?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    serve(listener, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "Failed to install Ctrl+C handler");
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use roomchat_core::{Identity, Role};
    use tower::ServiceExt;

    async fn app() -> (Router, AppState) {
        let state = create_app_state(AppConfig::for_tests()).await.unwrap();
        let gateway = create_gateway_state(&state);
        (create_app(state.clone(), gateway), state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app().await;
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert!(response.headers().contains_key(crate::middleware::REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_readiness_with_memory_storage() {
        let (app, _) = app().await;
        let response = app
            .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_rooms_require_bearer_token() {
        let (app, _) = app().await;
        let response = app
            .clone()
            .oneshot(Request::get("/api/rooms").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 401);
        assert_eq!(body_json(response).await["error"]["code"], "UNAUTHORIZED");

        let response = app
            .oneshot(
                Request::get("/api/rooms")
                    .header("authorization", "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 401);
    }

    #[tokio::test]
    async fn test_create_and_list_rooms() {
        let (app, state) = app().await;
        let alice = Identity::new(3, "Alice", Role::Client);
        state
            .service_context()
            .identity_repo()
            .upsert(&alice)
            .await
            .unwrap();
        let token = state.jwt_service().issue(&alice).unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/rooms")
                    .header("authorization", format!("Bearer {token}"))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"book-club"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
        let room = body_json(response).await;
        assert_eq!(room["name"], "book-club");
        assert!(room["passkey"].is_string());

        let response = app
            .oneshot(
                Request::get("/api/rooms")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let rooms = body_json(response).await;
        assert_eq!(rooms.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_room_id_path() {
        let (app, state) = app().await;
        let alice = Identity::new(3, "Alice", Role::Client);
        state
            .service_context()
            .identity_repo()
            .upsert(&alice)
            .await
            .unwrap();
        let token = state.jwt_service().issue(&alice).unwrap();

        let response = app
            .oneshot(
                Request::get("/api/rooms/not-a-number")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
        assert_eq!(body_json(response).await["error"]["code"], "INVALID_PATH_PARAMETER");
    }
}
