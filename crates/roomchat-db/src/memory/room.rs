//! In-memory RoomRepository

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use roomchat_core::entities::Room;
use roomchat_core::error::DomainError;
use roomchat_core::traits::{RepoResult, RoomRepository};
use roomchat_core::value_objects::Snowflake;

/// Rooms indexed by id and by unique name, with ordered participant lists
///
/// Lock order is always `by_name` before `rooms` before `participants`.
#[derive(Debug, Default)]
pub struct MemoryRoomRepository {
    rooms: DashMap<Snowflake, Room>,
    by_name: DashMap<String, Snowflake>,
    participants: DashMap<Snowflake, Vec<Snowflake>>,
}

impl MemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rooms
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn store(&self, room: &Room) {
        self.rooms.insert(room.id, room.clone());
        self.participants.insert(room.id, vec![room.creator_id]);
    }
}

#[async_trait]
impl RoomRepository for MemoryRoomRepository {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Room>> {
        Ok(self.rooms.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Room>> {
        let Some(id) = self.by_name.get(name).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn create(&self, room: &Room) -> RepoResult<()> {
        match self.by_name.entry(room.name.clone()) {
            Entry::Occupied(_) => Err(DomainError::RoomNameTaken(room.name.clone())),
            Entry::Vacant(slot) => {
                self.store(room);
                slot.insert(room.id);
                Ok(())
            }
        }
    }

    async fn get_or_create(&self, room: &Room) -> RepoResult<Room> {
        let id = match self.by_name.entry(room.name.clone()) {
            Entry::Occupied(existing) => *existing.get(),
            Entry::Vacant(slot) => {
                self.store(room);
                *slot.insert(room.id)
            }
        };

        self.rooms
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| DomainError::InternalError(format!("room {id} missing from index")))
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        let Some(name) = self.rooms.get(&id).map(|entry| entry.value().name.clone()) else {
            return Ok(false);
        };
        self.by_name.remove_if(&name, |_, indexed| *indexed == id);
        let removed = self.rooms.remove(&id).is_some();
        self.participants.remove(&id);
        Ok(removed)
    }

    async fn add_participant(&self, room_id: Snowflake, identity_id: Snowflake) -> RepoResult<bool> {
        if !self.rooms.contains_key(&room_id) {
            return Err(DomainError::RoomNotFound(room_id.to_string()));
        }
        let mut members = self.participants.entry(room_id).or_default();
        if members.contains(&identity_id) {
            return Ok(false);
        }
        members.push(identity_id);
        Ok(true)
    }

    async fn remove_participant(
        &self,
        room_id: Snowflake,
        identity_id: Snowflake,
    ) -> RepoResult<bool> {
        let Some(mut members) = self.participants.get_mut(&room_id) else {
            return Ok(false);
        };
        let before = members.len();
        members.retain(|id| *id != identity_id);
        Ok(members.len() != before)
    }

    async fn is_participant(&self, room_id: Snowflake, identity_id: Snowflake) -> RepoResult<bool> {
        Ok(self
            .participants
            .get(&room_id)
            .is_some_and(|members| members.contains(&identity_id)))
    }

    async fn list_participants(&self, room_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        Ok(self
            .participants
            .get(&room_id)
            .map(|members| members.value().clone())
            .unwrap_or_default())
    }

    async fn list_for_participant(&self, identity_id: Snowflake) -> RepoResult<Vec<Room>> {
        let room_ids: Vec<Snowflake> = self
            .participants
            .iter()
            .filter(|entry| entry.value().contains(&identity_id))
            .map(|entry| *entry.key())
            .collect();

        let mut rooms: Vec<Room> = room_ids
            .into_iter()
            .filter_map(|id| self.rooms.get(&id).map(|entry| entry.value().clone()))
            .collect();
        rooms.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rooms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn id(v: i64) -> Snowflake {
        Snowflake::new(v)
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_names() {
        let repo = MemoryRoomRepository::new();
        repo.create(&Room::new(id(1), "general", id(3))).await.unwrap();

        let err = repo.create(&Room::new(id(2), "general", id(7))).await.unwrap_err();
        assert!(matches!(err, DomainError::RoomNameTaken(_)));
        assert_eq!(repo.room_count(), 1);
    }

    #[tokio::test]
    async fn test_creator_is_first_participant() {
        let repo = MemoryRoomRepository::new();
        repo.create(&Room::new(id(1), "general", id(3))).await.unwrap();
        assert_eq!(repo.list_participants(id(1)).await.unwrap(), vec![id(3)]);
    }

    #[tokio::test]
    async fn test_get_or_create_returns_existing_room() {
        let repo = MemoryRoomRepository::new();
        let first = repo.get_or_create(&Room::new(id(1), "room_3_7", id(3))).await.unwrap();
        let second = repo.get_or_create(&Room::new(id(2), "room_3_7", id(3))).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.passkey, second.passkey);
        assert_eq!(repo.room_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_get_or_create_yields_one_room() {
        let repo = Arc::new(MemoryRoomRepository::new());
        let tasks: Vec<_> = (0..32)
            .map(|i| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.get_or_create(&Room::new(id(100 + i), "room_3_7", id(3)))
                        .await
                        .unwrap()
                        .id
                })
            })
            .collect();

        let ids = futures::future::join_all(tasks).await;
        let first = ids[0].as_ref().unwrap();
        assert!(ids.iter().all(|r| r.as_ref().unwrap() == first));
        assert_eq!(repo.room_count(), 1);
    }

    #[tokio::test]
    async fn test_participant_add_is_idempotent() {
        let repo = MemoryRoomRepository::new();
        repo.create(&Room::new(id(1), "general", id(3))).await.unwrap();

        assert!(repo.add_participant(id(1), id(7)).await.unwrap());
        assert!(!repo.add_participant(id(1), id(7)).await.unwrap());
        assert_eq!(repo.list_participants(id(1)).await.unwrap(), vec![id(3), id(7)]);

        assert!(repo.remove_participant(id(1), id(7)).await.unwrap());
        assert!(!repo.remove_participant(id(1), id(7)).await.unwrap());
        assert!(!repo.is_participant(id(1), id(7)).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_frees_the_name() {
        let repo = MemoryRoomRepository::new();
        repo.create(&Room::new(id(1), "general", id(3))).await.unwrap();
        repo.add_participant(id(1), id(7)).await.unwrap();

        assert!(repo.delete(id(1)).await.unwrap());
        assert!(!repo.delete(id(1)).await.unwrap());
        assert!(repo.find_by_name("general").await.unwrap().is_none());
        assert!(repo.list_participants(id(1)).await.unwrap().is_empty());
        assert!(repo.list_for_participant(id(7)).await.unwrap().is_empty());

        repo.create(&Room::new(id(2), "general", id(7))).await.unwrap();
        assert_eq!(repo.room_count(), 1);
    }

    #[tokio::test]
    async fn test_add_participant_to_unknown_room() {
        let repo = MemoryRoomRepository::new();
        assert!(repo.add_participant(id(1), id(3)).await.is_err());
    }

    #[tokio::test]
    async fn test_list_for_participant() {
        let repo = MemoryRoomRepository::new();
        repo.create(&Room::new(id(1), "general", id(3))).await.unwrap();
        repo.create(&Room::new(id(2), "random", id(7))).await.unwrap();
        repo.add_participant(id(2), id(3)).await.unwrap();

        let rooms = repo.list_for_participant(id(3)).await.unwrap();
        assert_eq!(rooms.len(), 2);
        assert!(repo.list_for_participant(id(99)).await.unwrap().is_empty());
    }
}
