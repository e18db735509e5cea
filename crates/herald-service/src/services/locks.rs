//! Per-member serialization
//!
//! Two passes may interleave across different members, but never work on the
//! same member at once.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use herald_core::Snowflake;

/// One async mutex per member id, created on first use
#[derive(Debug, Default)]
pub struct MemberLocks {
    locks: DashMap<Snowflake, Arc<Mutex<()>>>,
}

impl MemberLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `member_id`
    pub async fn acquire(&self, member_id: Snowflake) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the DashMap shard lock is not held across the await
        let lock = self
            .locks
            .entry(member_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        lock.lock_owned().await
    }

    /// Drop the lock entry for a member that left, if nobody holds it
    pub fn remove_idle(&self, member_id: Snowflake) {
        self.locks
            .remove_if(&member_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
