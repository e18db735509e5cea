//! Reconciliation service
//!
//! Drives the engine for one member (push trigger) or for every linked member
//! (timer pass). Members are processed one at a time, each under its own lock,
//! with a fresh platform snapshot read right before deciding.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use herald_core::{LiveStatus, MemberLink, Snowflake, StreamProbe};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::executor::{ActionExecutor, ExecutionReport};

/// What happened to one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MemberOutcome {
    /// No link at decision time (unlinked concurrently, or never linked)
    NotLinked,
    /// Linked but no longer in the guild
    NotInGuild,
    /// Plan decided and executed (possibly empty)
    Reconciled {
        live: LiveStatus,
        report: ExecutionReport,
    },
}

impl MemberOutcome {
    fn report(&self) -> Option<&ExecutionReport> {
        match self {
            Self::Reconciled { report, .. } => Some(report),
            _ => None,
        }
    }
}

/// Summary of a full pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub members: usize,
    pub live: usize,
    pub unknown: usize,
    pub not_in_guild: usize,
    pub actions_applied: usize,
    pub actions_failed: usize,
    /// Members whose store reads failed; retried next pass
    pub errors: usize,
    pub elapsed_ms: u64,
    pub finished_at: Option<DateTime<Utc>>,
}

impl PassReport {
    fn tally(&mut self, outcome: &MemberOutcome) {
        match outcome {
            MemberOutcome::NotLinked => {}
            MemberOutcome::NotInGuild => self.not_in_guild += 1,
            MemberOutcome::Reconciled { live, .. } => match live {
                LiveStatus::Live => self.live += 1,
                LiveStatus::Unknown => self.unknown += 1,
                LiveStatus::NotLive => {}
            },
        }
        if let Some(report) = outcome.report() {
            self.actions_applied += report.applied();
            self.actions_failed += report.failed();
        }
    }
}

/// Reconciliation service
pub struct ReconciliationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReconciliationService<'a> {
    /// Create a new ReconciliationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Reconcile every linked member against a fresh snapshot of the link table.
    ///
    /// Per-member failures are logged and counted; only a failure to read the
    /// link table aborts the pass.
    #[instrument(skip(self))]
    pub async fn run_pass(&self) -> ServiceResult<PassReport> {
        let started = Instant::now();
        let links = self.ctx.link_repo().find_all().await?;
        let mut report = PassReport {
            members: links.len(),
            ..PassReport::default()
        };

        if !links.is_empty() {
            let handles: Vec<String> = links.iter().map(|l| l.handle().to_string()).collect();
            let mut probes = self.ctx.probe().probe_many(&handles).await;
            let spacing = self.ctx.member_spacing();

            for (index, link) in links.iter().enumerate() {
                if index > 0 && !spacing.is_zero() {
                    tokio::time::sleep(spacing).await;
                }

                let probe = probes.remove(link.handle()).unwrap_or(StreamProbe::Unknown);
                match self.reconcile_with_probe(link.member_id, Some(probe)).await {
                    Ok(outcome) => report.tally(&outcome),
                    Err(e) => {
                        warn!(member_id = %link.member_id, error = %e, "Member reconciliation failed");
                        report.errors += 1;
                    }
                }
            }
        }

        report.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        report.finished_at = Some(Utc::now());
        info!(
            members = report.members,
            live = report.live,
            unknown = report.unknown,
            applied = report.actions_applied,
            failed = report.actions_failed,
            errors = report.errors,
            elapsed_ms = report.elapsed_ms,
            "Reconciliation pass complete"
        );
        Ok(report)
    }

    /// Reconcile one member, probing the live status now
    #[instrument(skip(self))]
    pub async fn reconcile_member(&self, member_id: Snowflake) -> ServiceResult<MemberOutcome> {
        self.reconcile_with_probe(member_id, None).await
    }

    /// Push trigger: record the member's current activity names and reconcile
    /// if the activity status changed and the member is linked.
    #[instrument(skip(self, activity_names))]
    pub async fn handle_presence<'n, I>(
        &self,
        member_id: Snowflake,
        activity_names: I,
    ) -> ServiceResult<Option<MemberOutcome>>
    where
        I: IntoIterator<Item = &'n str> + Send,
    {
        if !self.ctx.observer().observe_activities(member_id, activity_names) {
            return Ok(None);
        }
        // Cheap pre-check; the authoritative read happens under the lock
        if self.ctx.link_repo().find(member_id).await?.is_none() {
            return Ok(None);
        }

        debug!(member_id = %member_id, status = ?self.ctx.observer().status(member_id), "Activity changed; reconciling");
        self.reconcile_member(member_id).await.map(Some)
    }

    /// Serialize on the member, then decide and apply
    pub(crate) async fn reconcile_with_probe(
        &self,
        member_id: Snowflake,
        probe: Option<StreamProbe>,
    ) -> ServiceResult<MemberOutcome> {
        let _guard = self.ctx.locks().acquire(member_id).await;
        let Some(link) = self.ctx.link_repo().find(member_id).await? else {
            return Ok(MemberOutcome::NotLinked);
        };
        self.reconcile_locked(&link, probe).await
    }

    /// Caller holds the member lock
    pub(crate) async fn reconcile_locked(
        &self,
        link: &MemberLink,
        probe: Option<StreamProbe>,
    ) -> ServiceResult<MemberOutcome> {
        let member_id = link.member_id;

        let Some(member) = self.ctx.platform().fetch_member(member_id).await? else {
            debug!(member_id = %member_id, "Linked member is not in the guild");
            return Ok(MemberOutcome::NotInGuild);
        };

        let probe = match probe {
            Some(probe) => probe,
            None => self.ctx.probe().probe(link.handle()).await,
        };
        let live = self.ctx.live_filter().classify(&probe);
        let activity = self.ctx.observer().status(member_id);
        let history = self.ctx.history_repo().find(member_id).await?;

        let plan = self
            .ctx
            .engine()
            .decide(Some(link), live, activity, &member, history.as_ref());

        if plan.is_empty() {
            debug!(member_id = %member_id, %live, ?activity, "Member already converged");
            return Ok(MemberOutcome::Reconciled {
                live,
                report: ExecutionReport::default(),
            });
        }

        debug!(member_id = %member_id, %live, ?activity, ?plan, "Applying plan");
        let report = ActionExecutor::new(self.ctx).apply(member_id, &plan).await;
        Ok(MemberOutcome::Reconciled { live, report })
    }

    /// Return a member to the undecorated state. Caller holds the member lock.
    ///
    /// A member no longer in the guild has nothing to undo on the platform.
    pub(crate) async fn release_locked(&self, member_id: Snowflake) -> ServiceResult<ExecutionReport> {
        let Some(member) = self.ctx.platform().fetch_member(member_id).await? else {
            return Ok(ExecutionReport::default());
        };
        let history = self.ctx.history_repo().find(member_id).await?;
        let plan = self.ctx.engine().decide_release(&member, history.as_ref());

        if plan.is_empty() {
            return Ok(ExecutionReport::default());
        }
        debug!(member_id = %member_id, ?plan, "Releasing member");
        Ok(ActionExecutor::new(self.ctx).apply(member_id, &plan).await)
    }
}
