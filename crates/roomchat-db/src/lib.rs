//! # roomchat-db
//!
//! Persistence layer implementing the repository traits of `roomchat-core`.
//!
//! ## Overview
//!
//! - PostgreSQL repositories via SQLx, with migrations under `migrations/`
//! - In-memory repositories for single-process deployments and tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use roomchat_db::{create_pool, run_migrations, PgRoomRepository};
//!
//! async fn example(config: &roomchat_common::DatabaseConfig) -> anyhow::Result<()> {
//!     let pool = create_pool(config).await?;
//!     run_migrations(&pool).await?;
//!     let rooms = PgRoomRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::{MemoryIdentityRepository, MemoryMessageRepository, MemoryRoomRepository};
pub use pool::{create_pool, run_migrations, PgPool, MIGRATIONS_DIR};
pub use repositories::{PgIdentityRepository, PgMessageRepository, PgRoomRepository};
