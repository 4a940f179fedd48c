//! PostgreSQL implementation of IdentityRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use roomchat_core::entities::Identity;
use roomchat_core::traits::{IdentityRepository, RepoResult};
use roomchat_core::value_objects::Snowflake;

use crate::models::IdentityModel;

use super::error::map_db_error;

/// PostgreSQL implementation of IdentityRepository
#[derive(Clone)]
pub struct PgIdentityRepository {
    pool: PgPool,
}

impl PgIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityRepository for PgIdentityRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Identity>> {
        let result = sqlx::query_as::<_, IdentityModel>(
            r"
            SELECT id, username, role
            FROM identities
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Identity::from))
    }

    #[instrument(skip(self))]
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Identity>> {
        let raw: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();
        let results = sqlx::query_as::<_, IdentityModel>(
            r"
            SELECT id, username, role
            FROM identities
            WHERE id = ANY($1)
            ",
        )
        .bind(raw)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Identity::from).collect())
    }

    #[instrument(skip(self), fields(identity_id = %identity.id))]
    async fn upsert(&self, identity: &Identity) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO identities (id, username, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET username = EXCLUDED.username, role = EXCLUDED.role
            ",
        )
        .bind(identity.id.into_inner())
        .bind(&identity.username)
        .bind(identity.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
