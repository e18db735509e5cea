//! Service context - dependency container for services
//!
//! Holds the stores, the platform and probe adapters, and the shared
//! reconciliation state (engine, activity observer, per-member locks).

use std::sync::Arc;
use std::time::Duration;

use herald_core::traits::{GuildPlatform, LinkRepository, LiveStatusProbe, NicknameHistoryRepository};
use herald_core::{ActivityFilter, ReconcileEngine};

use super::error::{ServiceError, ServiceResult};
use super::locks::MemberLocks;
use super::observer::ActivityObserver;

/// Service context containing all dependencies
///
/// Cheap to clone; every clone shares the same observer and locks.
#[derive(Clone)]
pub struct ServiceContext {
    // Stores
    link_repo: Arc<dyn LinkRepository>,
    history_repo: Arc<dyn NicknameHistoryRepository>,

    // External systems
    platform: Arc<dyn GuildPlatform>,
    probe: Arc<dyn LiveStatusProbe>,

    // Reconciliation state
    engine: Arc<ReconcileEngine>,
    observer: Arc<ActivityObserver>,
    locks: Arc<MemberLocks>,

    // Policy
    live_filter: ActivityFilter,
    member_spacing: Duration,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        link_repo: Arc<dyn LinkRepository>,
        history_repo: Arc<dyn NicknameHistoryRepository>,
        platform: Arc<dyn GuildPlatform>,
        probe: Arc<dyn LiveStatusProbe>,
        engine: Arc<ReconcileEngine>,
        observer: Arc<ActivityObserver>,
        live_filter: ActivityFilter,
        member_spacing: Duration,
    ) -> Self {
        Self {
            link_repo,
            history_repo,
            platform,
            probe,
            engine,
            observer,
            locks: Arc::new(MemberLocks::new()),
            live_filter,
            member_spacing,
        }
    }

    // === Stores ===

    /// Get the link repository
    pub fn link_repo(&self) -> &dyn LinkRepository {
        self.link_repo.as_ref()
    }

    /// Get the nickname history repository
    pub fn history_repo(&self) -> &dyn NicknameHistoryRepository {
        self.history_repo.as_ref()
    }

    // === External systems ===

    /// Get the chat platform adapter
    pub fn platform(&self) -> &dyn GuildPlatform {
        self.platform.as_ref()
    }

    /// Get the live-status probe
    pub fn probe(&self) -> &dyn LiveStatusProbe {
        self.probe.as_ref()
    }

    // === Reconciliation state ===

    pub fn engine(&self) -> &ReconcileEngine {
        self.engine.as_ref()
    }

    pub fn observer(&self) -> &ActivityObserver {
        self.observer.as_ref()
    }

    pub fn locks(&self) -> &MemberLocks {
        self.locks.as_ref()
    }

    /// Which streams count as live
    pub fn live_filter(&self) -> &ActivityFilter {
        &self.live_filter
    }

    /// Pause between members within a pass
    pub fn member_spacing(&self) -> Duration {
        self.member_spacing
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("policy", self.engine.policy())
            .field("live_filter", &self.live_filter)
            .field("observed_members", &self.observer.len())
            .field("member_spacing", &self.member_spacing)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    link_repo: Option<Arc<dyn LinkRepository>>,
    history_repo: Option<Arc<dyn NicknameHistoryRepository>>,
    platform: Option<Arc<dyn GuildPlatform>>,
    probe: Option<Arc<dyn LiveStatusProbe>>,
    engine: Option<Arc<ReconcileEngine>>,
    observer: Option<Arc<ActivityObserver>>,
    live_filter: ActivityFilter,
    member_spacing: Duration,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link_repo(mut self, repo: Arc<dyn LinkRepository>) -> Self {
        self.link_repo = Some(repo);
        self
    }

    pub fn history_repo(mut self, repo: Arc<dyn NicknameHistoryRepository>) -> Self {
        self.history_repo = Some(repo);
        self
    }

    pub fn platform(mut self, platform: Arc<dyn GuildPlatform>) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn probe(mut self, probe: Arc<dyn LiveStatusProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn engine(mut self, engine: ReconcileEngine) -> Self {
        self.engine = Some(Arc::new(engine));
        self
    }

    pub fn observer(mut self, observer: Arc<ActivityObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn live_filter(mut self, filter: ActivityFilter) -> Self {
        self.live_filter = filter;
        self
    }

    pub fn member_spacing(mut self, spacing: Duration) -> Self {
        self.member_spacing = spacing;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.link_repo
                .ok_or_else(|| ServiceError::validation("link_repo is required"))?,
            self.history_repo
                .ok_or_else(|| ServiceError::validation("history_repo is required"))?,
            self.platform
                .ok_or_else(|| ServiceError::validation("platform is required"))?,
            self.probe
                .ok_or_else(|| ServiceError::validation("probe is required"))?,
            self.engine
                .ok_or_else(|| ServiceError::validation("engine is required"))?,
            self.observer
                .ok_or_else(|| ServiceError::validation("observer is required"))?,
            self.live_filter,
            self.member_spacing,
        ))
    }
}
