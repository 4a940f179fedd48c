//! roomchat server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p roomchat-api --bin roomchat
//! ```
//!
//! Configuration is loaded from `.env` and environment variables.

use roomchat_common::{try_init_tracing, AppConfig, StorageBackend};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    if let Err(e) = try_init_tracing(&config.logging) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let storage = match &config.storage {
        StorageBackend::Postgres(_) => "postgres",
        StorageBackend::Memory => "memory",
    };
    info!(
        address = %config.server.address(),
        storage,
        distributed = matches!(config.broadcast.backend, roomchat_common::BroadcastBackend::Redis(_)),
        "Configuration loaded"
    );

    if let Err(e) = roomchat_api::run(config).await {
        error!(error = %e, "Server failed");
        return Err(e.into());
    }

    Ok(())
}
