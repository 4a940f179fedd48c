//! Redis Pub/Sub bridge for broadcast groups.
//!
//! Lets several server processes share broadcast groups: events are published
//! to a Redis channel per group and a relay in every process forwards them to
//! the local hub.

mod channels;
mod publisher;
mod relay;

pub use channels::{group_channel, parse_group_channel, GROUP_CHANNEL_PATTERN, GROUP_CHANNEL_PREFIX};
pub use publisher::Publisher;
pub use relay::RedisRelay;
