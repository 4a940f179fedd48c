//! Publishing side of broadcast groups.

use std::sync::Arc;

use roomchat_core::{GroupKey, RoomEvent};

use crate::hub::{BroadcastHub, GroupSubscription};
use crate::pool::RedisPoolError;
use crate::pubsub::Publisher;

/// Error type for publishing
#[derive(Debug, thiserror::Error)]
pub enum BroadcastError {
    #[error("Failed to serialize event: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Redis publish failed: {0}")]
    Redis(#[from] RedisPoolError),
}

#[derive(Debug, Clone)]
enum Backend {
    Local,
    Redis(Publisher),
}

/// Publishes events to broadcast groups and hands out subscriptions.
///
/// Subscriptions always come from the local hub. With the Redis backend,
/// publishes travel through Redis and reach the hub via a [`crate::RedisRelay`].
#[derive(Debug, Clone)]
pub struct Broadcaster {
    hub: Arc<BroadcastHub>,
    backend: Backend,
}

impl Broadcaster {
    /// Broadcaster delivering straight into the hub
    #[must_use]
    pub fn local(hub: Arc<BroadcastHub>) -> Self {
        Self {
            hub,
            backend: Backend::Local,
        }
    }

    /// Broadcaster publishing through Redis
    #[must_use]
    pub fn redis(hub: Arc<BroadcastHub>, publisher: Publisher) -> Self {
        Self {
            hub,
            backend: Backend::Redis(publisher),
        }
    }

    /// Join a group
    #[must_use]
    pub fn subscribe(&self, key: &GroupKey) -> GroupSubscription {
        self.hub.subscribe(key)
    }

    /// Serialize an event once and publish it to every member of the group.
    ///
    /// Returns the number of receivers reported by the backend.
    pub async fn publish(&self, key: &GroupKey, event: &RoomEvent) -> Result<usize, BroadcastError> {
        let payload = event.to_json()?;

        match &self.backend {
            Backend::Local => Ok(self.hub.deliver(key, Arc::from(payload))),
            Backend::Redis(publisher) => Ok(publisher.publish(key, &payload).await?),
        }
    }

    /// Shared hub
    #[must_use]
    pub fn hub(&self) -> &Arc<BroadcastHub> {
        &self.hub
    }

    /// Whether events travel through Redis
    #[must_use]
    pub fn is_distributed(&self) -> bool {
        matches!(self.backend, Backend::Redis(_))
    }

    /// Check the Redis connection when one is in use
    pub async fn health_check(&self) -> Result<(), BroadcastError> {
        match &self.backend {
            Backend::Local => Ok(()),
            Backend::Redis(publisher) => Ok(publisher.pool().health_check().await?),
        }
    }
}
