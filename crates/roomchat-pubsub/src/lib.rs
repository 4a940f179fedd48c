//! # roomchat-pubsub
//!
//! Broadcast groups: every session subscribed under a group key receives every
//! event published to that key, including the publisher's own events.
//!
//! ## Features
//!
//! - **Hub**: process-scoped registry of per-group `tokio::sync::broadcast` channels
//! - **Broadcaster**: publishes serialized events locally or through Redis
//! - **Relay**: forwards Redis pub/sub messages into the local hub
//! - **Connection Pool**: managed Redis connections with deadpool
//!
//! ## Example
//!
//! ```ignore
//! use roomchat_core::{GroupKey, RoomName};
//! use roomchat_pubsub::{Broadcaster, BroadcastHub};
//!
//! let hub = BroadcastHub::new(256);
//! let broadcaster = Broadcaster::local(hub.clone());
//!
//! let key = GroupKey::room(&RoomName::parse("room_3_7")?);
//! let mut subscription = hub.subscribe(&key);
//! broadcaster.publish(&key, &event).await?;
//! let payload = subscription.recv().await?;
//! ```

pub mod broadcaster;
pub mod hub;
pub mod pool;
pub mod pubsub;

pub use broadcaster::{BroadcastError, Broadcaster};
pub use hub::{BroadcastHub, GroupSubscription, RecvError};
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
pub use pubsub::{
    group_channel, parse_group_channel, Publisher, RedisRelay, GROUP_CHANNEL_PATTERN,
    GROUP_CHANNEL_PREFIX,
};
