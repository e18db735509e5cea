//! Nickname history database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for nickname_history table
#[derive(Debug, Clone, FromRow)]
pub struct NicknameHistoryModel {
    pub discord_id: i64,
    pub saved_nickname: Option<String>,
    pub saved_at: DateTime<Utc>,
}
