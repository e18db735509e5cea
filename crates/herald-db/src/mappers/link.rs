//! MemberLink entity <-> model mapper

use herald_core::entities::MemberLink;
use herald_core::error::DomainError;
use herald_core::value_objects::{Snowflake, TwitchHandle};

use crate::models::LinkModel;

/// Rows written by older tooling may hold handles that no longer validate
impl TryFrom<LinkModel> for MemberLink {
    type Error = DomainError;

    fn try_from(model: LinkModel) -> Result<Self, Self::Error> {
        Ok(MemberLink {
            member_id: Snowflake::new(model.discord_id),
            external_handle: TwitchHandle::parse(&model.twitch_username)?,
            linked_at: model.linked_at,
        })
    }
}

/// Convert MemberLink entity reference to values for database insertion
pub struct LinkInsert<'a> {
    pub discord_id: i64,
    pub twitch_username: &'a str,
    pub linked_at: chrono::DateTime<chrono::Utc>,
}

impl<'a> LinkInsert<'a> {
    pub fn new(link: &'a MemberLink) -> Self {
        Self {
            discord_id: link.member_id.into_inner(),
            twitch_username: link.handle(),
            linked_at: link.linked_at,
        }
    }
}
