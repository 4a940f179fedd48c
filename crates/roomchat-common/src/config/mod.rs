//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, BroadcastBackend, BroadcastConfig, ConfigError, CorsConfig, DatabaseConfig,
    GatewayConfig, JwtConfig, LogFormat, LoggingConfig, RateLimitConfig, RedisConfig,
    ServerConfig, StorageBackend,
};
