//! Redis Pub/Sub publisher.

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::group_channel;
use redis::AsyncCommands;
use roomchat_core::GroupKey;

/// Publishes serialized group events to Redis
#[derive(Debug, Clone)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Publish a payload to a group's channel.
    ///
    /// Returns the number of Redis subscribers (relays) that received it.
    pub async fn publish(&self, key: &GroupKey, payload: &str) -> RedisResult<usize> {
        let channel = group_channel(key);
        let mut conn = self.pool.get().await?;
        let receivers: usize = conn.publish(&channel, payload).await?;

        tracing::trace!(channel = %channel, receivers, "Published group event");

        Ok(receivers)
    }

    /// Underlying pool
    #[must_use]
    pub fn pool(&self) -> &RedisPool {
        &self.pool
    }
}
