//! Action plans produced by the engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two roles managed by the reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    /// Granted while the member is live
    Streaming,
    /// Granted while the member is engaged in the tracked activity
    Activity,
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Streaming => write!(f, "streaming"),
            Self::Activity => write!(f, "activity"),
        }
    }
}

/// A single corrective mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum Action {
    GrantRole(RoleKind),
    RevokeRole(RoleKind),
    /// Set the guild nickname; `None` clears it
    SetNickname(Option<String>),
    /// Write the history record (depends on the preceding `SetNickname`)
    SaveHistory(Option<String>),
    /// Delete the history record (depends on the preceding `SetNickname`, if any)
    DeleteHistory,
}

impl Action {
    /// Whether this action mutates the nickname history store
    #[inline]
    pub fn is_history_mutation(&self) -> bool {
        matches!(self, Self::SaveHistory(_) | Self::DeleteHistory)
    }
}

/// Ordered list of actions for one member.
///
/// Order: role actions, then the nickname edit, then the history mutation
/// that depends on that edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPlan {
    actions: Vec<Action>,
}

impl ActionPlan {
    /// An empty plan
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    pub fn contains(&self, action: &Action) -> bool {
        self.actions.contains(action)
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
}

impl From<Vec<Action>> for ActionPlan {
    fn from(actions: Vec<Action>) -> Self {
        Self { actions }
    }
}

impl IntoIterator for ActionPlan {
    type Item = Action;
    type IntoIter = std::vec::IntoIter<Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.into_iter()
    }
}

impl<'a> IntoIterator for &'a ActionPlan {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}
