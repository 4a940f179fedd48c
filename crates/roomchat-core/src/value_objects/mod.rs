//! Value objects - immutable types identified by their value

mod group_key;
mod room_name;
mod snowflake;

pub use group_key::GroupKey;
pub use room_name::{PrivatePair, RoomName, MAX_ROOM_NAME_LENGTH, PRIVATE_ROOM_PREFIX};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
