//! In-process fakes shared by the service unit tests

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use herald_core::{
    GuildPlatform, LiveStatusProbe, LiveStream, MemberSnapshot, PlatformError, PlatformResult,
    ReconcileEngine, ReconcilePolicy, Snowflake, StreamProbe,
};
use herald_db::{InMemoryLinkRepository, InMemoryNicknameHistoryRepository};

use super::context::{ServiceContext, ServiceContextBuilder};
use super::observer::{ActivityMatcher, ActivityObserver};

pub const STREAM_ROLE: Snowflake = Snowflake::new(900);
pub const GAME_ROLE: Snowflake = Snowflake::new(901);

#[derive(Default)]
pub struct FakeGuild {
    pub members: Mutex<HashMap<Snowflake, MemberSnapshot>>,
    pub deny_nickname: Mutex<bool>,
}

impl FakeGuild {
    pub fn with_member(self, member: MemberSnapshot) -> Self {
        self.members.lock().insert(member.member_id, member);
        self
    }

    pub fn member(&self, id: Snowflake) -> MemberSnapshot {
        self.members.lock().get(&id).cloned().expect("member exists")
    }
}

#[async_trait]
impl GuildPlatform for FakeGuild {
    async fn fetch_member(&self, member_id: Snowflake) -> PlatformResult<Option<MemberSnapshot>> {
        Ok(self.members.lock().get(&member_id).cloned())
    }

    async fn add_role(&self, member_id: Snowflake, role_id: Snowflake) -> PlatformResult<()> {
        let mut members = self.members.lock();
        let member = members
            .get_mut(&member_id)
            .ok_or(PlatformError::MemberNotFound(member_id))?;
        member.add_role(role_id);
        Ok(())
    }

    async fn remove_role(&self, member_id: Snowflake, role_id: Snowflake) -> PlatformResult<()> {
        let mut members = self.members.lock();
        let member = members
            .get_mut(&member_id)
            .ok_or(PlatformError::MemberNotFound(member_id))?;
        member.remove_role(role_id);
        Ok(())
    }

    async fn set_nickname(&self, member_id: Snowflake, nickname: Option<&str>) -> PlatformResult<()> {
        if *self.deny_nickname.lock() {
            return Err(PlatformError::PermissionDenied("hierarchy".to_string()));
        }
        let mut members = self.members.lock();
        let member = members
            .get_mut(&member_id)
            .ok_or(PlatformError::MemberNotFound(member_id))?;
        member.set_nickname(nickname.map(String::from));
        Ok(())
    }
}

/// Probe answering from a fixed table; absent handles are offline
#[derive(Default)]
pub struct StaticProbe {
    pub answers: Mutex<HashMap<String, StreamProbe>>,
}

impl StaticProbe {
    pub fn set(&self, handle: &str, probe: StreamProbe) {
        self.answers.lock().insert(handle.to_string(), probe);
    }

    pub fn set_live(&self, handle: &str) {
        self.set(
            handle,
            StreamProbe::Live(LiveStream {
                user_login: handle.to_string(),
                category: Some("Star Citizen".to_string()),
                title: String::new(),
            }),
        );
    }
}

#[async_trait]
impl LiveStatusProbe for StaticProbe {
    async fn probe(&self, handle: &str) -> StreamProbe {
        self.answers
            .lock()
            .get(handle)
            .cloned()
            .unwrap_or(StreamProbe::Offline)
    }
}

pub struct Harness {
    pub ctx: ServiceContext,
    pub guild: Arc<FakeGuild>,
    pub probe: Arc<StaticProbe>,
    pub links: Arc<InMemoryLinkRepository>,
    pub history: Arc<InMemoryNicknameHistoryRepository>,
}

pub fn harness(guild: FakeGuild) -> Harness {
    let guild = Arc::new(guild);
    let probe = Arc::new(StaticProbe::default());
    let links = Arc::new(InMemoryLinkRepository::new());
    let history = Arc::new(InMemoryNicknameHistoryRepository::new());

    let ctx = ServiceContextBuilder::new()
        .link_repo(links.clone())
        .history_repo(history.clone())
        .platform(guild.clone())
        .probe(probe.clone())
        .engine(ReconcileEngine::new(ReconcilePolicy::new(STREAM_ROLE, GAME_ROLE)))
        .observer(Arc::new(ActivityObserver::new(ActivityMatcher::new("Star Citizen"))))
        .build()
        .expect("context builds");

    Harness {
        ctx,
        guild,
        probe,
        links,
        history,
    }
}
