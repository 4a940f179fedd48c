//! Forwards Redis group channels into the local hub.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use redis::Client;
use tokio::task::JoinHandle;

use crate::hub::BroadcastHub;
use crate::pubsub::{parse_group_channel, GROUP_CHANNEL_PATTERN};

const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Background task bridging Redis pub/sub to a [`BroadcastHub`]
pub struct RedisRelay;

impl RedisRelay {
    /// Start relaying. The task reconnects after errors and runs until aborted.
    #[must_use]
    pub fn spawn(redis_url: String, hub: Arc<BroadcastHub>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match Self::run(&redis_url, &hub).await {
                    Ok(()) => tracing::warn!("Redis relay stream ended, reconnecting"),
                    Err(e) => tracing::error!(error = %e, "Redis relay error, reconnecting"),
                }
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        })
    }

    async fn run(redis_url: &str, hub: &BroadcastHub) -> redis::RedisResult<()> {
        let client = Client::open(redis_url)?;
        let mut pubsub = client.get_async_pubsub().await?;
        pubsub.psubscribe(GROUP_CHANNEL_PATTERN).await?;

        tracing::info!(pattern = GROUP_CHANNEL_PATTERN, "Redis relay connected");

        let mut stream = pubsub.on_message();
        while let Some(msg) = stream.next().await {
            let channel = msg.get_channel_name();
            let Some(key) = parse_group_channel(channel) else {
                tracing::debug!(channel, "Ignoring message on unexpected channel");
                continue;
            };

            let payload: String = match msg.get_payload() {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!(channel, error = %e, "Undecodable relay payload");
                    continue;
                }
            };

            let delivered = hub.deliver(&key, Arc::from(payload));
            tracing::trace!(group = %key, delivered, "Relayed group event");
        }

        Ok(())
    }
}
