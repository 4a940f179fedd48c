//! Application state
//!
//! Holds the shared service context, the configuration, and the database
//! pool used by the readiness probe.

use std::sync::Arc;

use roomchat_common::{AppConfig, JwtService};
use roomchat_db::PgPool;
use roomchat_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
    /// `None` with the in-memory storage backend
    db_pool: Option<PgPool>,
}

impl AppState {
    pub fn new(service_context: ServiceContext, config: AppConfig, db_pool: Option<PgPool>) -> Self {
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            db_pool,
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &Arc<ServiceContext> {
        &self.service_context
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn jwt_service(&self) -> &JwtService {
        self.service_context.jwt_service()
    }

    pub fn db_pool(&self) -> Option<&PgPool> {
        self.db_pool.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("postgres", &self.db_pool.is_some())
            .finish_non_exhaustive()
    }
}
