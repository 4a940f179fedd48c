//! Application configuration
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Minimum accepted length of `JWT_SECRET` in bytes
const MIN_JWT_SECRET_LEN: usize = 32;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageBackend,
    pub broadcast: BroadcastConfig,
    pub jwt: JwtConfig,
    pub gateway: GatewayConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
    /// Snowflake worker id for this process
    pub worker_id: u16,
}

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where rooms, participants, and messages are stored
#[derive(Debug, Clone)]
pub enum StorageBackend {
    Postgres(DatabaseConfig),
    /// Process-local storage; lost on restart
    Memory,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub run_migrations: bool,
}

/// Broadcast group configuration
#[derive(Debug, Clone)]
pub struct BroadcastConfig {
    pub backend: BroadcastBackend,
    /// Events buffered per group before slow subscribers start skipping
    pub channel_capacity: usize,
}

/// Fan-out substrate
#[derive(Debug, Clone)]
pub enum BroadcastBackend {
    /// In-process groups only
    Local,
    /// Publish through Redis so every process sees every event
    Redis(RedisConfig),
}

/// Redis configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub max_connections: usize,
}

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds
    pub access_token_expiry: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .finish()
    }
}

/// Websocket session settings
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Close sessions that stay silent this long; `None` disables
    pub idle_timeout: Option<Duration>,
    pub max_message_length: usize,
}

/// CORS configuration
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
}

/// Rate limiting configuration for the HTTP surface
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub requests_per_second: u64,
    pub burst: u32,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected pretty or json, got {other}")),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required variables are missing or values do not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    /// Returns an error if required variables are missing or values do not parse
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let storage = match vars.string("STORAGE_BACKEND", "postgres").as_str() {
            "postgres" => StorageBackend::Postgres(DatabaseConfig {
                url: vars.required("DATABASE_URL")?,
                max_connections: vars.parse("DATABASE_MAX_CONNECTIONS", 10)?,
                min_connections: vars.parse("DATABASE_MIN_CONNECTIONS", 1)?,
                connect_timeout: Duration::from_secs(
                    vars.parse("DATABASE_CONNECT_TIMEOUT_SECS", 30)?,
                ),
                run_migrations: vars.parse("RUN_MIGRATIONS", true)?,
            }),
            "memory" => StorageBackend::Memory,
            other => {
                return Err(ConfigError::InvalidValue(
                    "STORAGE_BACKEND",
                    format!("expected postgres or memory, got {other}"),
                ))
            }
        };

        let backend = match vars.string("BROADCAST_BACKEND", "local").as_str() {
            "local" => BroadcastBackend::Local,
            "redis" => BroadcastBackend::Redis(RedisConfig {
                url: vars.required("REDIS_URL")?,
                max_connections: vars.parse("REDIS_POOL_SIZE", 10)?,
            }),
            other => {
                return Err(ConfigError::InvalidValue(
                    "BROADCAST_BACKEND",
                    format!("expected local or redis, got {other}"),
                ))
            }
        };

        let secret = vars.required("JWT_SECRET")?;
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET",
                format!("must be at least {MIN_JWT_SECRET_LEN} bytes"),
            ));
        }

        let idle_secs: u64 = vars.parse("GATEWAY_IDLE_TIMEOUT_SECS", 300)?;

        Ok(Self {
            server: ServerConfig {
                host: vars.string("SERVER_HOST", "0.0.0.0"),
                port: vars.parse("SERVER_PORT", 8000)?,
                request_timeout: Duration::from_secs(vars.parse("REQUEST_TIMEOUT_SECS", 30)?),
            },
            storage,
            broadcast: BroadcastConfig {
                backend,
                channel_capacity: vars.parse("BROADCAST_CHANNEL_CAPACITY", 256)?,
            },
            jwt: JwtConfig {
                secret,
                access_token_expiry: vars.parse("JWT_ACCESS_TOKEN_EXPIRY", 7200)?,
            },
            gateway: GatewayConfig {
                idle_timeout: (idle_secs > 0).then(|| Duration::from_secs(idle_secs)),
                max_message_length: vars.parse("MAX_MESSAGE_LENGTH", 4000)?,
            },
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            rate_limit: RateLimitConfig {
                enabled: vars.parse("RATE_LIMIT_ENABLED", true)?,
                requests_per_second: vars.parse("RATE_LIMIT_REQUESTS_PER_SECOND", 50)?,
                burst: vars.parse("RATE_LIMIT_BURST", 100)?,
            },
            logging: LoggingConfig {
                default_filter: vars.string("LOG_DEFAULT_FILTER", "info,roomchat=debug"),
                format: vars.parse("LOG_FORMAT", LogFormat::Pretty)?,
            },
            worker_id: vars.parse("WORKER_ID", 0)?,
        })
    }

    /// In-memory storage, local broadcast, fixed secret, no rate limiting
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                request_timeout: Duration::from_secs(10),
            },
            storage: StorageBackend::Memory,
            broadcast: BroadcastConfig {
                backend: BroadcastBackend::Local,
                channel_capacity: 64,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-that-is-long-enough-for-hs256".to_string(),
                access_token_expiry: 7200,
            },
            gateway: GatewayConfig {
                idle_timeout: None,
                max_message_length: 4000,
            },
            cors: CorsConfig::default(),
            rate_limit: RateLimitConfig {
                enabled: false,
                requests_per_second: 50,
                burst: 100,
            },
            logging: LoggingConfig {
                default_filter: "warn".to_string(),
                format: LogFormat::Pretty,
            },
            worker_id: 0,
        }
    }
}

struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, key: &str, default: &str) -> String {
        (self.0)(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        (self.0)(key)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar(key))
    }

    fn parse<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match (self.0)(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidValue(key, e.to_string())),
            None => Ok(default),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
