//! External truths fed into reconciliation
//!
//! - [`StreamProbe`]: what the streaming platform reported for a handle
//! - [`LiveStatus`]: the tri-state the engine decides on, after [`ActivityFilter`]
//! - [`ActivityStatus`]: what the chat platform's presence feed says

use serde::{Deserialize, Serialize};
use std::fmt;

/// An active stream as reported by the streaming platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveStream {
    pub user_login: String,
    /// Category (game) name; empty categories are reported as `None`
    pub category: Option<String>,
    pub title: String,
}

/// Raw result of a live-status lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamProbe {
    Live(LiveStream),
    Offline,
    /// The lookup failed (transport error, HTTP error, credential failure)
    Unknown,
}

impl StreamProbe {
    #[inline]
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }
}

/// Live status of a member for one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveStatus {
    Live,
    NotLive,
    /// Probe failed; must never be treated as `NotLive`
    Unknown,
}

impl fmt::Display for LiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::NotLive => write!(f, "not_live"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Which live streams count as decoration-worthy
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActivityFilter {
    /// Any live stream counts
    #[default]
    None,
    /// Only streams whose category equals this name (case-insensitive)
    ExactCategoryMatch(String),
}

impl ActivityFilter {
    /// Collapse a probe result into the engine's tri-state
    pub fn classify(&self, probe: &StreamProbe) -> LiveStatus {
        match probe {
            StreamProbe::Unknown => LiveStatus::Unknown,
            StreamProbe::Offline => LiveStatus::NotLive,
            StreamProbe::Live(stream) => match self {
                Self::None => LiveStatus::Live,
                Self::ExactCategoryMatch(wanted) => {
                    let matches = stream
                        .category
                        .as_deref()
                        .is_some_and(|category| category.trim().eq_ignore_ascii_case(wanted.trim()));
                    if matches {
                        LiveStatus::Live
                    } else {
                        LiveStatus::NotLive
                    }
                }
            },
        }
    }
}

/// Whether a member is engaged in the tracked activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Active,
    Inactive,
    /// No presence seen for this member yet; treated like an unknown probe
    Unobserved,
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
            Self::Unobserved => write!(f, "unobserved"),
        }
    }
}

/// How presence and live status combine into the activity axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityComposition {
    /// Only the presence feed decides
    #[default]
    PresenceOnly,
    /// Being live also counts as engaged
    PresenceOrLive,
}

impl ActivityComposition {
    /// Effective activity status for the activity-role axis
    ///
    /// Under `PresenceOrLive` an unknown live status may have been the only
    /// reason the role is held, so an inactive presence cannot revoke it.
    pub fn compose(self, presence: ActivityStatus, live: LiveStatus) -> ActivityStatus {
        match (self, live, presence) {
            (Self::PresenceOrLive, LiveStatus::Live, _) => ActivityStatus::Active,
            (Self::PresenceOrLive, LiveStatus::Unknown, ActivityStatus::Inactive) => {
                ActivityStatus::Unobserved
            }
            _ => presence,
        }
    }
}
