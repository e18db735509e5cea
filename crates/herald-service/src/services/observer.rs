//! Activity observer
//!
//! Last-known activity status per member, fed by presence pushes. A push
//! only matters to the reconciler when it changes the recorded status.

use dashmap::DashMap;
use tracing::trace;

use herald_core::{ActivityStatus, Snowflake};

/// Decides whether a presence activity name is the tracked one
#[derive(Debug, Clone)]
pub struct ActivityMatcher {
    needle: String,
}

impl ActivityMatcher {
    /// Case-insensitive substring match on `tracked` ("Star Citizen" matches
    /// "Star Citizen - Alpha 4.0")
    pub fn new(tracked: &str) -> Self {
        Self {
            needle: tracked.trim().to_lowercase(),
        }
    }

    pub fn matches(&self, activity_name: &str) -> bool {
        !self.needle.is_empty() && activity_name.to_lowercase().contains(&self.needle)
    }

    /// Active if any of the member's current activities matches
    pub fn classify<'a, I>(&self, activity_names: I) -> ActivityStatus
    where
        I: IntoIterator<Item = &'a str>,
    {
        if activity_names.into_iter().any(|name| self.matches(name)) {
            ActivityStatus::Active
        } else {
            ActivityStatus::Inactive
        }
    }
}

/// Per-member activity status, shared between the gateway handler and passes
#[derive(Debug)]
pub struct ActivityObserver {
    matcher: ActivityMatcher,
    statuses: DashMap<Snowflake, ActivityStatus>,
}

impl ActivityObserver {
    pub fn new(matcher: ActivityMatcher) -> Self {
        Self {
            matcher,
            statuses: DashMap::new(),
        }
    }

    pub fn matcher(&self) -> &ActivityMatcher {
        &self.matcher
    }

    /// Last observed status; `Unobserved` until the first presence arrives
    pub fn status(&self, member_id: Snowflake) -> ActivityStatus {
        self.statuses
            .get(&member_id)
            .map_or(ActivityStatus::Unobserved, |s| *s.value())
    }

    /// Record a status. Returns whether it differs from the previous one.
    pub fn observe(&self, member_id: Snowflake, status: ActivityStatus) -> bool {
        let previous = self.statuses.insert(member_id, status);
        let changed = previous != Some(status);
        if changed {
            trace!(member_id = %member_id, ?previous, ?status, "Activity status changed");
        }
        changed
    }

    /// Classify the member's current activity names and record the result
    pub fn observe_activities<'a, I>(&self, member_id: Snowflake, activity_names: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let status = self.matcher.classify(activity_names);
        self.observe(member_id, status)
    }

    /// Drop a member (left the guild)
    pub fn forget(&self, member_id: Snowflake) {
        self.statuses.remove(&member_id);
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}
