//! In-memory MessageRepository

use async_trait::async_trait;
use dashmap::DashMap;

use roomchat_core::entities::Message;
use roomchat_core::traits::{MessageRepository, RepoResult};
use roomchat_core::value_objects::Snowflake;

/// Messages grouped by room in commit order
#[derive(Debug, Default)]
pub struct MemoryMessageRepository {
    by_room: DashMap<Option<Snowflake>, Vec<Message>>,
}

impl MemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored messages across rooms
    pub fn len(&self) -> usize {
        self.by_room.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MessageRepository for MemoryMessageRepository {
    async fn append(&self, message: &Message) -> RepoResult<()> {
        self.by_room
            .entry(message.room_id)
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn list_by_room(&self, room_id: Snowflake) -> RepoResult<Vec<Message>> {
        let mut messages = self
            .by_room
            .get(&Some(room_id))
            .map(|entry| entry.value().clone())
            .unwrap_or_default();
        // Commit order can differ from stamp order when sends race
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(messages)
    }

    async fn detach_room(&self, room_id: Snowflake) -> RepoResult<u64> {
        let Some((_, mut detached)) = self.by_room.remove(&Some(room_id)) else {
            return Ok(0);
        };
        for message in &mut detached {
            message.room_id = None;
        }
        let count = detached.len() as u64;
        self.by_room.entry(None).or_default().append(&mut detached);
        Ok(count)
    }
}
