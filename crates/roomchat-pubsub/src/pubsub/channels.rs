//! Redis channel naming for broadcast groups.

use roomchat_core::GroupKey;

/// Prefix of every group channel
pub const GROUP_CHANNEL_PREFIX: &str = "roomchat:group:";

/// Pattern matching every group channel
pub const GROUP_CHANNEL_PATTERN: &str = "roomchat:group:*";

/// Redis channel carrying events for a group
#[must_use]
pub fn group_channel(key: &GroupKey) -> String {
    format!("{GROUP_CHANNEL_PREFIX}{key}")
}

/// Recover the group key from a Redis channel name
#[must_use]
pub fn parse_group_channel(channel: &str) -> Option<GroupKey> {
    channel
        .strip_prefix(GROUP_CHANNEL_PREFIX)
        .filter(|rest| !rest.is_empty())
        .map(GroupKey::from_raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomchat_core::RoomName;

    #[test]
    fn test_channel_names() {
        let key = GroupKey::room(&RoomName::parse("room_7_3").unwrap());
        assert_eq!(group_channel(&key), "roomchat:group:chat_room_3_7");
        assert_eq!(group_channel(&GroupKey::lobby()), "roomchat:group:rooms");
    }

    #[test]
    fn test_parse_channel() {
        let key = GroupKey::room(&RoomName::parse("general").unwrap());
        assert_eq!(parse_group_channel(&group_channel(&key)), Some(key));
        assert_eq!(parse_group_channel("roomchat:group:"), None);
        assert_eq!(parse_group_channel("other:channel"), None);
    }
}
