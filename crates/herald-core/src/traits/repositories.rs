//! Repository traits (ports) - define the interface for data access
//!
//! Two logical tables, both keyed by member id with one row per member:
//! `links {member_id -> handle}` and `nickname_history {member_id -> saved nickname}`.

use async_trait::async_trait;

use crate::entities::{MemberLink, NicknameRecord};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Link Repository
// ============================================================================

#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Find the link for a member
    async fn find(&self, member_id: Snowflake) -> RepoResult<Option<MemberLink>>;

    /// Find the member linked to a handle
    async fn find_by_handle(&self, handle: &str) -> RepoResult<Option<MemberLink>>;

    /// Create or replace the member's link.
    ///
    /// Fails with `HandleAlreadyLinked` if another member owns the handle.
    async fn upsert(&self, link: &MemberLink) -> RepoResult<()>;

    /// Delete the member's link; returns whether one existed
    async fn delete(&self, member_id: Snowflake) -> RepoResult<bool>;

    /// Fresh snapshot of every link, ordered by member id
    async fn find_all(&self) -> RepoResult<Vec<MemberLink>>;
}

// ============================================================================
// Nickname History Repository
// ============================================================================

#[async_trait]
pub trait NicknameHistoryRepository: Send + Sync {
    /// Find the saved nickname record for a member
    async fn find(&self, member_id: Snowflake) -> RepoResult<Option<NicknameRecord>>;

    /// Create the member's record.
    ///
    /// Fails with `HistoryAlreadyExists` if one is present: overwriting would
    /// lose the original nickname.
    async fn create(&self, record: &NicknameRecord) -> RepoResult<()>;

    /// Delete the member's record; returns whether one existed
    async fn delete(&self, member_id: Snowflake) -> RepoResult<bool>;
}
