//! Twitch link database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for twitch_links table
#[derive(Debug, Clone, FromRow)]
pub struct LinkModel {
    pub discord_id: i64,
    pub twitch_username: String,
    pub linked_at: DateTime<Utc>,
}
