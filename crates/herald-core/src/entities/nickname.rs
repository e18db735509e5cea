//! Nickname record entity - the reversible-mutation ledger entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// The nickname a member had before the current decorated episode began.
///
/// Its presence means the member's nickname is currently owned by the
/// reconciler. `saved_nickname == None` records that the member had no guild
/// nickname at all, so restoring clears the nickname instead of pinning the
/// account name as a nickname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NicknameRecord {
    pub member_id: Snowflake,
    pub saved_nickname: Option<String>,
    pub saved_at: DateTime<Utc>,
}

impl NicknameRecord {
    /// Create a new record stamped with the current time
    pub fn new(member_id: Snowflake, saved_nickname: Option<String>) -> Self {
        Self {
            member_id,
            saved_nickname,
            saved_at: Utc::now(),
        }
    }

    /// The saved nickname, if the member had one
    #[inline]
    pub fn saved(&self) -> Option<&str> {
        self.saved_nickname.as_deref()
    }
}
