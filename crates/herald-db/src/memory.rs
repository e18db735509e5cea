//! In-process repositories
//!
//! Used when no database is configured outside production, and by tests.
//! State is lost on restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;

use herald_core::entities::{MemberLink, NicknameRecord};
use herald_core::error::DomainError;
use herald_core::traits::{LinkRepository, NicknameHistoryRepository, RepoResult};
use herald_core::value_objects::Snowflake;

/// In-memory implementation of LinkRepository
///
/// A single lock covers the whole table so the handle uniqueness check and
/// the write happen atomically.
#[derive(Debug, Default)]
pub struct InMemoryLinkRepository {
    links: RwLock<BTreeMap<Snowflake, MemberLink>>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.links.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.read().is_empty()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn find(&self, member_id: Snowflake) -> RepoResult<Option<MemberLink>> {
        Ok(self.links.read().get(&member_id).cloned())
    }

    async fn find_by_handle(&self, handle: &str) -> RepoResult<Option<MemberLink>> {
        Ok(self
            .links
            .read()
            .values()
            .find(|link| link.handle().eq_ignore_ascii_case(handle))
            .cloned())
    }

    async fn upsert(&self, link: &MemberLink) -> RepoResult<()> {
        let mut links = self.links.write();
        let taken = links
            .values()
            .any(|other| other.member_id != link.member_id && other.handle() == link.handle());
        if taken {
            return Err(DomainError::HandleAlreadyLinked(link.handle().to_string()));
        }
        links.insert(link.member_id, link.clone());
        Ok(())
    }

    async fn delete(&self, member_id: Snowflake) -> RepoResult<bool> {
        Ok(self.links.write().remove(&member_id).is_some())
    }

    async fn find_all(&self) -> RepoResult<Vec<MemberLink>> {
        Ok(self.links.read().values().cloned().collect())
    }
}

/// In-memory implementation of NicknameHistoryRepository
#[derive(Debug, Default)]
pub struct InMemoryNicknameHistoryRepository {
    records: DashMap<Snowflake, NicknameRecord>,
}

impl InMemoryNicknameHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl NicknameHistoryRepository for InMemoryNicknameHistoryRepository {
    async fn find(&self, member_id: Snowflake) -> RepoResult<Option<NicknameRecord>> {
        Ok(self.records.get(&member_id).map(|r| r.value().clone()))
    }

    async fn create(&self, record: &NicknameRecord) -> RepoResult<()> {
        match self.records.entry(record.member_id) {
            Entry::Occupied(_) => Err(DomainError::HistoryAlreadyExists(record.member_id)),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn delete(&self, member_id: Snowflake) -> RepoResult<bool> {
        Ok(self.records.remove(&member_id).is_some())
    }
}
