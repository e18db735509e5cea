//! Schema bootstrap
//!
//! Two tables, one row per member in each. `twitch_username` is unique so a
//! handle can never be claimed by two members.

use sqlx::PgPool;
use tracing::{info, instrument};

const STATEMENTS: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS twitch_links (
        discord_id      BIGINT PRIMARY KEY,
        twitch_username TEXT NOT NULL UNIQUE,
        linked_at       TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS nickname_history (
        discord_id      BIGINT PRIMARY KEY,
        saved_nickname  TEXT NULL,
        saved_at        TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    ",
];

/// Create the tables if they do not exist yet. Safe to run on every start.
#[instrument(skip(pool))]
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    info!(tables = STATEMENTS.len(), "Database schema ready");
    Ok(())
}
