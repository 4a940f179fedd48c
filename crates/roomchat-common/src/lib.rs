//! # roomchat-common
//!
//! Shared utilities including configuration, error handling, token authentication, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{Claims, JwtService, TokenType};
pub use config::{
    AppConfig, BroadcastBackend, BroadcastConfig, ConfigError, CorsConfig, DatabaseConfig,
    GatewayConfig, JwtConfig, LogFormat, LoggingConfig, RateLimitConfig, RedisConfig,
    ServerConfig, StorageBackend,
};
pub use error::AppError;
pub use telemetry::{try_init_tracing, TracingError};
