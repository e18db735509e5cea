//! Member snapshot - a guild member's roles and nickname as read from the platform

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Point-in-time view of a guild member.
///
/// Read immediately before deciding and never kept beyond one reconciliation
/// pass: the platform is the source of truth for current roles and nickname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSnapshot {
    pub member_id: Snowflake,
    /// Account-level name (global display name, falling back to username)
    pub account_name: String,
    /// Guild nickname, if one is set
    pub nickname: Option<String>,
    pub role_ids: Vec<Snowflake>,
}

impl MemberSnapshot {
    /// Create a snapshot with no nickname and no roles
    pub fn new(member_id: Snowflake, account_name: impl Into<String>) -> Self {
        Self {
            member_id,
            account_name: account_name.into(),
            nickname: None,
            role_ids: Vec::new(),
        }
    }

    /// Set the nickname (builder style)
    #[must_use]
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// Add a role (builder style)
    #[must_use]
    pub fn with_role(mut self, role_id: Snowflake) -> Self {
        self.add_role(role_id);
        self
    }

    /// Get display name (nickname if set, otherwise the account name)
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.account_name)
    }

    /// Check if member has a specific role
    #[inline]
    pub fn has_role(&self, role_id: Snowflake) -> bool {
        self.role_ids.contains(&role_id)
    }

    /// Add a role to the member
    pub fn add_role(&mut self, role_id: Snowflake) {
        if !self.has_role(role_id) {
            self.role_ids.push(role_id);
        }
    }

    /// Remove a role from the member
    pub fn remove_role(&mut self, role_id: Snowflake) {
        self.role_ids.retain(|&id| id != role_id);
    }

    /// Update the member's nickname
    pub fn set_nickname(&mut self, nickname: Option<String>) {
        self.nickname = nickname;
    }
}
