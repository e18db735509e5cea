//! Decision tables
//!
//! Three independent axes are evaluated per member:
//!
//! | axis | driven by |
//! |---|---|
//! | streaming role | `LiveStatus` |
//! | nickname | `LiveStatus` + history record + current nickname |
//! | activity role | `ActivityStatus` composed with `LiveStatus` |
//!
//! `Unknown`/`Unobserved` inputs are no-ops on every axis they drive.

use crate::decoration::Decorator;
use crate::entities::{MemberLink, MemberSnapshot, NicknameRecord};
use crate::status::{ActivityComposition, ActivityStatus, LiveStatus};
use crate::value_objects::Snowflake;

use super::plan::{Action, ActionPlan, RoleKind};

/// Static inputs shared by every decision
#[derive(Debug, Clone)]
pub struct ReconcilePolicy {
    pub streaming_role: Snowflake,
    pub activity_role: Snowflake,
    pub decorator: Decorator,
    pub composition: ActivityComposition,
}

impl ReconcilePolicy {
    pub fn new(streaming_role: Snowflake, activity_role: Snowflake) -> Self {
        Self {
            streaming_role,
            activity_role,
            decorator: Decorator::default(),
            composition: ActivityComposition::default(),
        }
    }

    #[must_use]
    pub fn with_decorator(mut self, decorator: Decorator) -> Self {
        self.decorator = decorator;
        self
    }

    #[must_use]
    pub fn with_composition(mut self, composition: ActivityComposition) -> Self {
        self.composition = composition;
        self
    }

    /// Role id for a managed role
    pub fn role_id(&self, kind: RoleKind) -> Snowflake {
        match kind {
            RoleKind::Streaming => self.streaming_role,
            RoleKind::Activity => self.activity_role,
        }
    }
}

/// Decoration-relevant view of a member, derived from a [`MemberSnapshot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecorationState {
    pub has_streaming_role: bool,
    pub has_activity_role: bool,
    pub is_decorated: bool,
}

impl DecorationState {
    pub fn observe(policy: &ReconcilePolicy, member: &MemberSnapshot) -> Self {
        Self {
            has_streaming_role: member.has_role(policy.streaming_role),
            has_activity_role: member.has_role(policy.activity_role),
            is_decorated: member
                .nickname
                .as_deref()
                .is_some_and(|nick| policy.decorator.is_decorated(nick)),
        }
    }

    fn has(&self, kind: RoleKind) -> bool {
        match kind {
            RoleKind::Streaming => self.has_streaming_role,
            RoleKind::Activity => self.has_activity_role,
        }
    }
}

/// The reconciliation engine. Cheap to clone and side-effect free.
#[derive(Debug, Clone)]
pub struct ReconcileEngine {
    policy: ReconcilePolicy,
}

impl ReconcileEngine {
    pub fn new(policy: ReconcilePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ReconcilePolicy {
        &self.policy
    }

    /// Decide the corrective plan for one member.
    ///
    /// An unlinked member always gets an empty plan.
    pub fn decide(
        &self,
        link: Option<&MemberLink>,
        live_status: LiveStatus,
        activity_status: ActivityStatus,
        member: &MemberSnapshot,
        history: Option<&NicknameRecord>,
    ) -> ActionPlan {
        let mut plan = ActionPlan::new();
        if link.is_none() {
            return plan;
        }

        let state = DecorationState::observe(&self.policy, member);

        // Streaming role
        match live_status {
            LiveStatus::Live if !state.has_streaming_role => {
                plan.push(Action::GrantRole(RoleKind::Streaming));
            }
            LiveStatus::NotLive if state.has_streaming_role => {
                plan.push(Action::RevokeRole(RoleKind::Streaming));
            }
            _ => {}
        }

        // Activity role
        let activity = self.policy.composition.compose(activity_status, live_status);
        match activity {
            ActivityStatus::Active if !state.has_activity_role => {
                plan.push(Action::GrantRole(RoleKind::Activity));
            }
            ActivityStatus::Inactive if state.has_activity_role => {
                plan.push(Action::RevokeRole(RoleKind::Activity));
            }
            _ => {}
        }

        // Nickname
        match live_status {
            LiveStatus::Live => self.decorate_nickname(&mut plan, &state, member, history),
            LiveStatus::NotLive => self.undecorate_nickname(&mut plan, &state, member, history),
            LiveStatus::Unknown => {}
        }

        plan
    }

    /// Plan that returns a member to the undecorated state regardless of
    /// external truths. Used when a member unlinks or leaves: they drop out
    /// of the timer iteration, so nothing else would clean up after them.
    pub fn decide_release(
        &self,
        member: &MemberSnapshot,
        history: Option<&NicknameRecord>,
    ) -> ActionPlan {
        let mut plan = ActionPlan::new();
        let state = DecorationState::observe(&self.policy, member);

        for kind in [RoleKind::Streaming, RoleKind::Activity] {
            if state.has(kind) {
                plan.push(Action::RevokeRole(kind));
            }
        }
        self.undecorate_nickname(&mut plan, &state, member, history);

        plan
    }

    fn decorate_nickname(
        &self,
        plan: &mut ActionPlan,
        state: &DecorationState,
        member: &MemberSnapshot,
        history: Option<&NicknameRecord>,
    ) {
        if state.is_decorated {
            return;
        }

        let decorator = &self.policy.decorator;
        match history {
            // History already owns this episode: re-apply from it, never save twice
            Some(record) => {
                let base = record.saved().unwrap_or(&member.account_name);
                plan.push(Action::SetNickname(Some(decorator.decorate(base))));
            }
            None => {
                plan.push(Action::SetNickname(Some(
                    decorator.decorate(member.display_name()),
                )));
                plan.push(Action::SaveHistory(member.nickname.clone()));
            }
        }
    }

    fn undecorate_nickname(
        &self,
        plan: &mut ActionPlan,
        state: &DecorationState,
        member: &MemberSnapshot,
        history: Option<&NicknameRecord>,
    ) {
        match history {
            Some(record) => {
                if member.nickname.as_deref() != record.saved() {
                    plan.push(Action::SetNickname(record.saved_nickname.clone()));
                }
                plan.push(Action::DeleteHistory);
            }
            // Orphaned decoration (e.g. crash between edit and history write)
            None if state.is_decorated => {
                let current = member.nickname.as_deref().unwrap_or_default();
                plan.push(Action::SetNickname(self.policy.decorator.strip(current)));
            }
            None => {}
        }
    }
}
