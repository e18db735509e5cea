//! PostgreSQL implementation of NicknameHistoryRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use herald_core::entities::NicknameRecord;
use herald_core::error::DomainError;
use herald_core::traits::{NicknameHistoryRepository, RepoResult};
use herald_core::value_objects::Snowflake;

use crate::models::NicknameHistoryModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of NicknameHistoryRepository
#[derive(Clone)]
pub struct PgNicknameHistoryRepository {
    pool: PgPool,
}

impl PgNicknameHistoryRepository {
    /// Create a new PgNicknameHistoryRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NicknameHistoryRepository for PgNicknameHistoryRepository {
    #[instrument(skip(self))]
    async fn find(&self, member_id: Snowflake) -> RepoResult<Option<NicknameRecord>> {
        let result = sqlx::query_as::<_, NicknameHistoryModel>(
            r"
            SELECT discord_id, saved_nickname, saved_at
            FROM nickname_history
            WHERE discord_id = $1
            ",
        )
        .bind(member_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(NicknameRecord::from))
    }

    #[instrument(skip(self), fields(member_id = %record.member_id))]
    async fn create(&self, record: &NicknameRecord) -> RepoResult<()> {
        // Plain INSERT: an existing row holds the original nickname and must win
        sqlx::query(
            r"
            INSERT INTO nickname_history (discord_id, saved_nickname, saved_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(record.member_id.into_inner())
        .bind(record.saved())
        .bind(record.saved_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::HistoryAlreadyExists(record.member_id))
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, member_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM nickname_history WHERE discord_id = $1
            ",
        )
        .bind(member_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
