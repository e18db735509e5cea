//! Action executor
//!
//! Applies a plan against the guild and the nickname history store. Failures
//! never propagate: each action yields an [`ApplyOutcome`] and the pass moves
//! on. A history write only happens once the nickname edit it records has
//! actually landed.

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use herald_core::{
    Action, ActionPlan, DomainError, NicknameRecord, PlatformError, RoleKind, Snowflake,
};

use super::context::ServiceContext;

/// Result of applying one action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyOutcome {
    Applied,
    /// The bot lacks rights (role hierarchy, guild owner nickname, ...)
    PermissionDenied,
    /// Network, rate limit, 5xx or store failure; the next pass retries
    TransientError,
    /// Not attempted because the edit it depends on did not apply
    Skipped,
}

impl ApplyOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

impl From<&PlatformError> for ApplyOutcome {
    fn from(err: &PlatformError) -> Self {
        match err {
            PlatformError::PermissionDenied(_) => Self::PermissionDenied,
            PlatformError::MemberNotFound(_) | PlatformError::Transient(_) => Self::TransientError,
        }
    }
}

/// One action and what happened to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedAction {
    pub action: Action,
    pub outcome: ApplyOutcome,
}

/// Outcomes for a whole plan, in plan order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    pub results: Vec<AppliedAction>,
}

impl ExecutionReport {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of actions that took effect
    pub fn applied(&self) -> usize {
        self.count(ApplyOutcome::Applied)
    }

    /// Number of actions that were attempted and failed
    pub fn failed(&self) -> usize {
        self.count(ApplyOutcome::PermissionDenied) + self.count(ApplyOutcome::TransientError)
    }

    pub fn count(&self, outcome: ApplyOutcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    /// Outcome of the first matching action, if the plan contained it
    pub fn outcome_of(&self, action: &Action) -> Option<ApplyOutcome> {
        self.results
            .iter()
            .find(|r| &r.action == action)
            .map(|r| r.outcome)
    }

    fn record(&mut self, action: &Action, outcome: ApplyOutcome) {
        self.results.push(AppliedAction {
            action: action.clone(),
            outcome,
        });
    }
}

/// Applies action plans
pub struct ActionExecutor<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ActionExecutor<'a> {
    /// Create a new ActionExecutor
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Apply `plan` for `member_id`, in order
    #[instrument(skip(self, plan), fields(actions = plan.len()))]
    pub async fn apply(&self, member_id: Snowflake, plan: &ActionPlan) -> ExecutionReport {
        let mut report = ExecutionReport::default();
        // Outcome of the most recent nickname edit in this plan, if any
        let mut nickname_edit: Option<ApplyOutcome> = None;

        for action in plan {
            let outcome = match action {
                Action::GrantRole(kind) => self.grant(member_id, *kind).await,
                Action::RevokeRole(kind) => self.revoke(member_id, *kind).await,
                Action::SetNickname(nickname) => {
                    let outcome = self.set_nickname(member_id, nickname.as_deref()).await;
                    nickname_edit = Some(outcome);
                    outcome
                }
                Action::SaveHistory(_) | Action::DeleteHistory
                    if nickname_edit.is_some_and(|o| !o.is_applied()) =>
                {
                    debug!(member_id = %member_id, ?action, "Nickname edit did not apply; leaving history untouched");
                    ApplyOutcome::Skipped
                }
                Action::SaveHistory(saved) => self.save_history(member_id, saved.clone()).await,
                Action::DeleteHistory => self.delete_history(member_id).await,
            };
            report.record(action, outcome);
        }

        report
    }

    async fn grant(&self, member_id: Snowflake, kind: RoleKind) -> ApplyOutcome {
        let role_id = self.ctx.engine().policy().role_id(kind);
        let result = self.ctx.platform().add_role(member_id, role_id).await;
        log_platform(member_id, &Action::GrantRole(kind), result)
    }

    async fn revoke(&self, member_id: Snowflake, kind: RoleKind) -> ApplyOutcome {
        let role_id = self.ctx.engine().policy().role_id(kind);
        let result = self.ctx.platform().remove_role(member_id, role_id).await;
        log_platform(member_id, &Action::RevokeRole(kind), result)
    }

    async fn set_nickname(&self, member_id: Snowflake, nickname: Option<&str>) -> ApplyOutcome {
        let result = self.ctx.platform().set_nickname(member_id, nickname).await;
        log_platform(
            member_id,
            &Action::SetNickname(nickname.map(String::from)),
            result,
        )
    }

    async fn save_history(&self, member_id: Snowflake, saved: Option<String>) -> ApplyOutcome {
        let record = NicknameRecord::new(member_id, saved);
        match self.ctx.history_repo().create(&record).await {
            Ok(()) => {
                info!(member_id = %member_id, saved = ?record.saved_nickname, "Saved original nickname");
                ApplyOutcome::Applied
            }
            // The stored original wins; nothing was lost
            Err(DomainError::HistoryAlreadyExists(_)) => {
                debug!(member_id = %member_id, "Nickname history already present");
                ApplyOutcome::Applied
            }
            Err(e) => {
                warn!(member_id = %member_id, error = %e, "Failed to save nickname history");
                ApplyOutcome::TransientError
            }
        }
    }

    async fn delete_history(&self, member_id: Snowflake) -> ApplyOutcome {
        match self.ctx.history_repo().delete(member_id).await {
            Ok(existed) => {
                info!(member_id = %member_id, existed, "Cleared nickname history");
                ApplyOutcome::Applied
            }
            Err(e) => {
                warn!(member_id = %member_id, error = %e, "Failed to delete nickname history");
                ApplyOutcome::TransientError
            }
        }
    }
}

fn log_platform(
    member_id: Snowflake,
    action: &Action,
    result: Result<(), PlatformError>,
) -> ApplyOutcome {
    match result {
        Ok(()) => {
            info!(member_id = %member_id, ?action, "Applied action");
            ApplyOutcome::Applied
        }
        Err(e) => {
            let outcome = ApplyOutcome::from(&e);
            warn!(member_id = %member_id, ?action, ?outcome, error = %e, "Action not applied");
            outcome
        }
    }
}
