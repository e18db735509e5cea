//! Serenity-backed guild platform
//!
//! Implements the reconciler's [`GuildPlatform`] port with Discord REST calls
//! scoped to the one managed guild.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::builder::EditMember;
use serenity::http::Http;
use serenity::model::guild::Member;
use serenity::model::id::{GuildId, RoleId, UserId};
use tracing::instrument;

use herald_core::{GuildPlatform, MemberSnapshot, PlatformError, PlatformResult, Snowflake};

const AUDIT_REASON: &str = "Live status reconciliation";

/// The managed guild, reached through Discord's REST API
pub struct SerenityGuild {
    http: Arc<Http>,
    guild_id: GuildId,
}

impl SerenityGuild {
    pub fn new(http: Arc<Http>, guild_id: Snowflake) -> Self {
        Self {
            http,
            guild_id: to_guild_id(guild_id),
        }
    }
}

#[async_trait]
impl GuildPlatform for SerenityGuild {
    #[instrument(skip(self))]
    async fn fetch_member(&self, member_id: Snowflake) -> PlatformResult<Option<MemberSnapshot>> {
        match self.http.get_member(self.guild_id, to_user_id(member_id)).await {
            Ok(member) => Ok(Some(snapshot(&member))),
            Err(e) => match classify(member_id, &e) {
                PlatformError::MemberNotFound(_) => Ok(None),
                other => Err(other),
            },
        }
    }

    #[instrument(skip(self))]
    async fn add_role(&self, member_id: Snowflake, role_id: Snowflake) -> PlatformResult<()> {
        self.http
            .add_member_role(
                self.guild_id,
                to_user_id(member_id),
                RoleId::new(role_id.as_u64()),
                Some(AUDIT_REASON),
            )
            .await
            .map_err(|e| classify(member_id, &e))
    }

    #[instrument(skip(self))]
    async fn remove_role(&self, member_id: Snowflake, role_id: Snowflake) -> PlatformResult<()> {
        self.http
            .remove_member_role(
                self.guild_id,
                to_user_id(member_id),
                RoleId::new(role_id.as_u64()),
                Some(AUDIT_REASON),
            )
            .await
            .map_err(|e| classify(member_id, &e))
    }

    #[instrument(skip(self))]
    async fn set_nickname(&self, member_id: Snowflake, nickname: Option<&str>) -> PlatformResult<()> {
        // An empty nickname resets the member to their account name
        let builder = EditMember::new()
            .nickname(nickname.unwrap_or_default())
            .audit_log_reason(AUDIT_REASON);

        self.guild_id
            .edit_member(self.http.as_ref(), to_user_id(member_id), builder)
            .await
            .map(|_| ())
            .map_err(|e| classify(member_id, &e))
    }
}

/// Project a serenity member onto the fields the engine reads
pub fn snapshot(member: &Member) -> MemberSnapshot {
    MemberSnapshot {
        member_id: Snowflake::from_u64(member.user.id.get()),
        account_name: member
            .user
            .global_name
            .clone()
            .unwrap_or_else(|| member.user.name.clone()),
        nickname: member.nick.clone(),
        role_ids: member
            .roles
            .iter()
            .map(|role| Snowflake::from_u64(role.get()))
            .collect(),
    }
}

fn classify(member_id: Snowflake, err: &serenity::Error) -> PlatformError {
    let status = match err {
        serenity::Error::Http(http_err) => http_err.status_code().map(|s| s.as_u16()),
        _ => None,
    };
    classify_status(member_id, status, err.to_string())
}

/// Map a Discord REST status onto the reconciler's failure classes
pub(crate) fn classify_status(
    member_id: Snowflake,
    status: Option<u16>,
    message: String,
) -> PlatformError {
    match status {
        Some(403) => PlatformError::PermissionDenied(message),
        Some(404) => PlatformError::MemberNotFound(member_id),
        _ => PlatformError::Transient(message),
    }
}

pub(crate) fn to_guild_id(id: Snowflake) -> GuildId {
    GuildId::new(id.as_u64())
}

pub(crate) fn to_user_id(id: Snowflake) -> UserId {
    UserId::new(id.as_u64())
}
