//! Chat-platform port - member reads and the three mutations the reconciler performs

use async_trait::async_trait;
use thiserror::Error;

use crate::entities::MemberSnapshot;
use crate::value_objects::Snowflake;

/// Chat-platform failures, classified by how the reconciler reacts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The bot lacks rights for this mutation (role hierarchy, owner nickname, ...)
    #[error("Missing permission: {0}")]
    PermissionDenied(String),

    #[error("Member not found: {0}")]
    MemberNotFound(Snowflake),

    /// Network error, rate limit, 5xx
    #[error("Transient platform error: {0}")]
    Transient(String),
}

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

/// The managed guild, as seen by the reconciler
#[async_trait]
pub trait GuildPlatform: Send + Sync {
    /// Read a member's current roles and nickname; `None` if not in the guild
    async fn fetch_member(&self, member_id: Snowflake) -> PlatformResult<Option<MemberSnapshot>>;

    /// Add a role to a member
    async fn add_role(&self, member_id: Snowflake, role_id: Snowflake) -> PlatformResult<()>;

    /// Remove a role from a member
    async fn remove_role(&self, member_id: Snowflake, role_id: Snowflake) -> PlatformResult<()>;

    /// Set the member's guild nickname; `None` clears it
    async fn set_nickname(&self, member_id: Snowflake, nickname: Option<&str>) -> PlatformResult<()>;
}
