//! Member link entity - an opt-in association between a member and a Twitch handle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Snowflake, TwitchHandle};

/// A member who opted in to live tracking.
///
/// Only ever created by an explicit link command; reconciliation never
/// creates one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberLink {
    pub member_id: Snowflake,
    pub external_handle: TwitchHandle,
    pub linked_at: DateTime<Utc>,
}

impl MemberLink {
    /// Create a new link stamped with the current time
    pub fn new(member_id: Snowflake, external_handle: TwitchHandle) -> Self {
        Self {
            member_id,
            external_handle,
            linked_at: Utc::now(),
        }
    }

    /// The linked Twitch login
    #[inline]
    pub fn handle(&self) -> &str {
        self.external_handle.as_str()
    }
}
