//! Request DTOs for the bot's slash commands
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

use herald_core::Snowflake;

/// `/link <twitch>` request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LinkRequest {
    pub member_id: Snowflake,

    /// Raw handle as typed; normalized by `TwitchHandle::parse`
    #[validate(length(min = 1, max = 64, message = "Twitch handle must be 1-64 characters"))]
    pub twitch_username: String,
}

impl LinkRequest {
    pub fn new(member_id: Snowflake, twitch_username: impl Into<String>) -> Self {
        Self {
            member_id,
            twitch_username: twitch_username.into(),
        }
    }
}
