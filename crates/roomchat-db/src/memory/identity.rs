//! In-memory IdentityRepository

use async_trait::async_trait;
use dashmap::DashMap;

use roomchat_core::entities::Identity;
use roomchat_core::traits::{IdentityRepository, RepoResult};
use roomchat_core::value_objects::Snowflake;

#[derive(Debug, Default)]
pub struct MemoryIdentityRepository {
    identities: DashMap<Snowflake, Identity>,
}

impl MemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityRepository for MemoryIdentityRepository {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Identity>> {
        Ok(self.identities.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Identity>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.identities.get(id).map(|entry| entry.value().clone()))
            .collect())
    }

    async fn upsert(&self, identity: &Identity) -> RepoResult<()> {
        self.identities.insert(identity.id, identity.clone());
        Ok(())
    }
}
