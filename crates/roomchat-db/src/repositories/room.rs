//! PostgreSQL implementation of RoomRepository
//!
//! Room names carry a unique constraint; get-or-create relies on
//! `ON CONFLICT DO NOTHING` followed by a re-read so concurrent first
//! contact never produces two rooms for one name.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use roomchat_core::entities::Room;
use roomchat_core::error::DomainError;
use roomchat_core::traits::{RepoResult, RoomRepository};
use roomchat_core::value_objects::Snowflake;

use crate::models::RoomModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of RoomRepository
#[derive(Clone)]
pub struct PgRoomRepository {
    pool: PgPool,
}

impl PgRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_creator(
        tx: &mut Transaction<'_, Postgres>,
        room: &Room,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"
            INSERT INTO room_participants (room_id, identity_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(room.id.into_inner())
        .bind(room.creator_id.into_inner())
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Room>> {
        let result = sqlx::query_as::<_, RoomModel>(
            r"
            SELECT id, name, created_by, created_at, passkey
            FROM rooms
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Room::from))
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Room>> {
        let result = sqlx::query_as::<_, RoomModel>(
            r"
            SELECT id, name, created_by, created_at, passkey
            FROM rooms
            WHERE name = $1
            ",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Room::from))
    }

    #[instrument(skip(self, room), fields(room = %room.name))]
    async fn create(&self, room: &Room) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO rooms (id, name, created_by, created_at, passkey)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(room.id.into_inner())
        .bind(&room.name)
        .bind(room.creator_id.into_inner())
        .bind(room.created_at)
        .bind(room.passkey.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::RoomNameTaken(room.name.clone())))?;

        Self::insert_creator(&mut tx, room).await.map_err(map_db_error)?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, room), fields(room = %room.name))]
    async fn get_or_create(&self, room: &Room) -> RepoResult<Room> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let inserted = sqlx::query(
            r"
            INSERT INTO rooms (id, name, created_by, created_at, passkey)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO NOTHING
            ",
        )
        .bind(room.id.into_inner())
        .bind(&room.name)
        .bind(room.creator_id.into_inner())
        .bind(room.created_at)
        .bind(room.passkey.as_str())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected()
            == 1;

        if inserted {
            Self::insert_creator(&mut tx, room).await.map_err(map_db_error)?;
        }
        tx.commit().await.map_err(map_db_error)?;

        self.find_by_name(&room.name).await?.ok_or_else(|| {
            DomainError::InternalError(format!("room {} vanished after upsert", room.name))
        })
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        // Participants cascade; messages keep their rows with room_id set to NULL
        let result = sqlx::query(
            r"
            DELETE FROM rooms
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn add_participant(&self, room_id: Snowflake, identity_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO room_participants (room_id, identity_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(room_id.into_inner())
        .bind(identity_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn remove_participant(
        &self,
        room_id: Snowflake,
        identity_id: Snowflake,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM room_participants
            WHERE room_id = $1 AND identity_id = $2
            ",
        )
        .bind(room_id.into_inner())
        .bind(identity_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn is_participant(&self, room_id: Snowflake, identity_id: Snowflake) -> RepoResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r"
            SELECT EXISTS(
                SELECT 1 FROM room_participants WHERE room_id = $1 AND identity_id = $2
            )
            ",
        )
        .bind(room_id.into_inner())
        .bind(identity_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn list_participants(&self, room_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r"
            SELECT identity_id
            FROM room_participants
            WHERE room_id = $1
            ORDER BY joined_at ASC, identity_id ASC
            ",
        )
        .bind(room_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ids.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn list_for_participant(&self, identity_id: Snowflake) -> RepoResult<Vec<Room>> {
        let results = sqlx::query_as::<_, RoomModel>(
            r"
            SELECT r.id, r.name, r.created_by, r.created_at, r.passkey
            FROM rooms r
            JOIN room_participants p ON p.room_id = r.id
            WHERE p.identity_id = $1
            ORDER BY r.created_at DESC, r.id DESC
            ",
        )
        .bind(identity_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Room::from).collect())
    }
}
