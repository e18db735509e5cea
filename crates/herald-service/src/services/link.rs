//! Link service
//!
//! Opt-in and opt-out commands, the read-only status query, and cleanup when
//! a member leaves the guild.

use tracing::{info, instrument, warn};
use validator::Validate;

use herald_core::{DomainError, MemberLink, Snowflake, TwitchHandle};

use crate::dto::{LinkRequest, LinkStatusResponse, UnlinkResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::reconcile::ReconciliationService;

/// Link service
pub struct LinkService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LinkService<'a> {
    /// Create a new LinkService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Link (or relink) a member to a Twitch handle, then reconcile them
    /// right away so the reply and the guild agree.
    #[instrument(skip(self), fields(member_id = %req.member_id))]
    pub async fn link(&self, req: LinkRequest) -> ServiceResult<LinkStatusResponse> {
        req.validate()?;
        let handle = TwitchHandle::parse(&req.twitch_username).map_err(DomainError::from)?;

        // Reject a handle owned by someone else before touching the member.
        // The upsert's uniqueness check still settles concurrent claims.
        if let Some(owner) = self.ctx.link_repo().find_by_handle(handle.as_str()).await? {
            if owner.member_id != req.member_id {
                return Err(DomainError::HandleAlreadyLinked(handle.to_string()).into());
            }
        }

        let _guard = self.ctx.locks().acquire(req.member_id).await;

        let link = MemberLink::new(req.member_id, handle);
        self.ctx.link_repo().upsert(&link).await?;
        info!(handle = %link.external_handle, "Member linked");

        let probe = self.ctx.probe().probe(link.handle()).await;
        let status = self.ctx.live_filter().classify(&probe);

        if let Err(e) = ReconciliationService::new(self.ctx)
            .reconcile_locked(&link, Some(probe.clone()))
            .await
        {
            // The link is stored; the next pass converges the member
            warn!(error = %e, "Immediate reconciliation after link failed");
        }

        Ok(LinkStatusResponse::new(link.handle(), status, &probe))
    }

    /// Remove the member's link after returning them to the undecorated state
    #[instrument(skip(self))]
    pub async fn unlink(&self, member_id: Snowflake) -> ServiceResult<UnlinkResponse> {
        let _guard = self.ctx.locks().acquire(member_id).await;

        let Some(link) = self.ctx.link_repo().find(member_id).await? else {
            return Ok(UnlinkResponse {
                twitch_username: None,
            });
        };

        let report = ReconciliationService::new(self.ctx)
            .release_locked(member_id)
            .await?;
        if report.failed() > 0 {
            warn!(failed = report.failed(), "Some decorations could not be removed");
        }

        self.ctx.link_repo().delete(member_id).await?;
        info!(handle = %link.external_handle, "Member unlinked");

        Ok(UnlinkResponse {
            twitch_username: Some(link.handle().to_string()),
        })
    }

    /// Read-only live status for the member's linked handle
    #[instrument(skip(self))]
    pub async fn status(&self, member_id: Snowflake) -> ServiceResult<LinkStatusResponse> {
        let link = self
            .ctx
            .link_repo()
            .find(member_id)
            .await?
            .ok_or_else(|| ServiceError::from(DomainError::LinkNotFound(member_id)))?;

        let probe = self.ctx.probe().probe(link.handle()).await;
        let status = self.ctx.live_filter().classify(&probe);
        Ok(LinkStatusResponse::new(link.handle(), status, &probe))
    }

    /// The member left the guild: nothing on the platform can be restored,
    /// so drop every stored trace of them.
    #[instrument(skip(self))]
    pub async fn member_left(&self, member_id: Snowflake) -> ServiceResult<bool> {
        let removed = {
            let _guard = self.ctx.locks().acquire(member_id).await;
            let link_removed = self.ctx.link_repo().delete(member_id).await?;
            let history_removed = self.ctx.history_repo().delete(member_id).await?;
            self.ctx.observer().forget(member_id);
            link_removed || history_removed
        };
        self.ctx.locks().remove_idle(member_id);

        if removed {
            info!("Cleared stored state for departed member");
        }
        Ok(removed)
    }
}
