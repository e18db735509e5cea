//! Test helpers for integration tests
//!
//! Wires the real services over in-memory stores and the fixtures, and
//! spawns the health endpoint on an ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Response};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use herald_bot::{health, RuntimeStatus};
use herald_core::{
    ActivityComposition, ActivityFilter, LinkRepository, LiveStatusProbe, MemberLink,
    NicknameHistoryRepository, NicknameRecord, ReconcileEngine, ReconcilePolicy, Snowflake,
    TwitchHandle,
};
use herald_db::{InMemoryLinkRepository, InMemoryNicknameHistoryRepository};
use herald_service::{
    ActivityMatcher, ActivityObserver, LinkService, ReconciliationService, ServiceContext,
    ServiceContextBuilder,
};

use crate::fixtures::{FakeGuild, ScriptedProbe, GAME_ROLE, STREAM_ROLE, TRACKED_GAME};

/// Real services over fakes, with handles on every fake for assertions
pub struct TestHarness {
    pub ctx: ServiceContext,
    pub guild: Arc<FakeGuild>,
    pub links: Arc<InMemoryLinkRepository>,
    pub history: Arc<InMemoryNicknameHistoryRepository>,
}

/// Knobs for [`TestHarness`]
pub struct HarnessOptions {
    pub filter: ActivityFilter,
    pub composition: ActivityComposition,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            filter: ActivityFilter::None,
            composition: ActivityComposition::PresenceOnly,
        }
    }
}

impl TestHarness {
    /// Harness answering live status from `probe`
    pub fn new(guild: FakeGuild, probe: Arc<dyn LiveStatusProbe>) -> Self {
        Self::with_options(guild, probe, HarnessOptions::default())
    }

    pub fn with_options(
        guild: FakeGuild,
        probe: Arc<dyn LiveStatusProbe>,
        options: HarnessOptions,
    ) -> Self {
        let guild = Arc::new(guild);
        let links = Arc::new(InMemoryLinkRepository::new());
        let history = Arc::new(InMemoryNicknameHistoryRepository::new());

        let policy =
            ReconcilePolicy::new(STREAM_ROLE, GAME_ROLE).with_composition(options.composition);

        let ctx = ServiceContextBuilder::new()
            .link_repo(links.clone())
            .history_repo(history.clone())
            .platform(guild.clone())
            .probe(probe)
            .engine(ReconcileEngine::new(policy))
            .observer(Arc::new(ActivityObserver::new(ActivityMatcher::new(
                TRACKED_GAME,
            ))))
            .live_filter(options.filter)
            .build()
            .expect("test context builds");

        Self {
            ctx,
            guild,
            links,
            history,
        }
    }

    pub fn reconciler(&self) -> ReconciliationService<'_> {
        ReconciliationService::new(&self.ctx)
    }

    pub fn commands(&self) -> LinkService<'_> {
        LinkService::new(&self.ctx)
    }

    /// Store a link directly, bypassing the command (no immediate reconcile)
    pub async fn seed_link(&self, member_id: Snowflake, handle: &str) {
        let handle = TwitchHandle::parse(handle).expect("valid handle");
        self.links
            .upsert(&MemberLink::new(member_id, handle))
            .await
            .expect("seed link");
    }

    /// Store a history record directly
    pub async fn seed_history(&self, member_id: Snowflake, saved: Option<&str>) {
        self.history
            .create(&NicknameRecord::new(member_id, saved.map(String::from)))
            .await
            .expect("seed history");
    }

    pub async fn saved_nickname(&self, member_id: Snowflake) -> Option<Option<String>> {
        self.history
            .find(member_id)
            .await
            .expect("history read")
            .map(|record| record.saved_nickname)
    }
}

/// Harness with a fresh scripted probe; returns both
pub fn scripted(guild: FakeGuild) -> (TestHarness, Arc<ScriptedProbe>) {
    let probe = Arc::new(ScriptedProbe::new());
    (TestHarness::new(guild, probe.clone()), probe)
}

/// Health endpoint on an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start the health router over `status`
    pub async fn start(status: RuntimeStatus) -> Result<Self> {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let app = health::create_router(status);
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }
}
