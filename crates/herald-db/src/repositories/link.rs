//! PostgreSQL implementation of LinkRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{instrument, warn};

use herald_core::entities::MemberLink;
use herald_core::error::DomainError;
use herald_core::traits::{LinkRepository, RepoResult};
use herald_core::value_objects::Snowflake;

use crate::mappers::LinkInsert;
use crate::models::LinkModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of LinkRepository
#[derive(Clone)]
pub struct PgLinkRepository {
    pool: PgPool,
}

impl PgLinkRepository {
    /// Create a new PgLinkRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    #[instrument(skip(self))]
    async fn find(&self, member_id: Snowflake) -> RepoResult<Option<MemberLink>> {
        let result = sqlx::query_as::<_, LinkModel>(
            r"
            SELECT discord_id, twitch_username, linked_at
            FROM twitch_links
            WHERE discord_id = $1
            ",
        )
        .bind(member_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(MemberLink::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_handle(&self, handle: &str) -> RepoResult<Option<MemberLink>> {
        let result = sqlx::query_as::<_, LinkModel>(
            r"
            SELECT discord_id, twitch_username, linked_at
            FROM twitch_links
            WHERE LOWER(twitch_username) = LOWER($1)
            ",
        )
        .bind(handle)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(MemberLink::try_from).transpose()
    }

    #[instrument(skip(self), fields(member_id = %link.member_id, handle = %link.handle()))]
    async fn upsert(&self, link: &MemberLink) -> RepoResult<()> {
        let insert = LinkInsert::new(link);

        sqlx::query(
            r"
            INSERT INTO twitch_links (discord_id, twitch_username, linked_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (discord_id) DO UPDATE
            SET twitch_username = EXCLUDED.twitch_username, linked_at = EXCLUDED.linked_at
            ",
        )
        .bind(insert.discord_id)
        .bind(insert.twitch_username)
        .bind(insert.linked_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::HandleAlreadyLinked(insert.twitch_username.to_string())
            })
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, member_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM twitch_links WHERE discord_id = $1
            ",
        )
        .bind(member_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<MemberLink>> {
        let results = sqlx::query_as::<_, LinkModel>(
            r"
            SELECT discord_id, twitch_username, linked_at
            FROM twitch_links
            ORDER BY discord_id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        // One unreadable row must not stall every other member
        Ok(results
            .into_iter()
            .filter_map(|model| {
                let discord_id = model.discord_id;
                MemberLink::try_from(model)
                    .map_err(|e| warn!(discord_id, error = %e, "Skipping unreadable link row"))
                    .ok()
            })
            .collect())
    }
}
