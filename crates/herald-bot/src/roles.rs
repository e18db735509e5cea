//! Startup role resolution
//!
//! Roles are configured by name and resolved to ids once, against the live
//! guild, before the gateway client starts.

use serenity::http::Http;
use tracing::info;

use herald_common::{ConfigError, RoleConfig};
use herald_core::Snowflake;

use crate::platform::to_guild_id;

/// Role ids the engine works with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRoles {
    pub streaming: Snowflake,
    pub activity: Snowflake,
}

/// Look up both configured roles in the guild.
///
/// # Errors
/// `GuildUnreachable` if the guild's roles cannot be listed with this token,
/// `RoleNotFound` if either name is missing.
pub async fn resolve_roles(
    http: &Http,
    guild_id: Snowflake,
    config: &RoleConfig,
) -> Result<ResolvedRoles, ConfigError> {
    let roles = http
        .get_guild_roles(to_guild_id(guild_id))
        .await
        .map_err(|_| ConfigError::GuildUnreachable(guild_id))?;

    let named: Vec<(Snowflake, String)> = roles
        .into_iter()
        .map(|role| (Snowflake::from_u64(role.id.get()), role.name))
        .collect();

    let resolved = ResolvedRoles {
        streaming: find_role(&named, &config.stream_role_name)?,
        activity: find_role(&named, &config.activity_role_name)?,
    };
    info!(
        streaming = %resolved.streaming,
        activity = %resolved.activity,
        "Resolved guild roles"
    );
    Ok(resolved)
}

/// Exact name match; the first role wins when names are duplicated
fn find_role(roles: &[(Snowflake, String)], name: &str) -> Result<Snowflake, ConfigError> {
    roles
        .iter()
        .find(|(_, role_name)| role_name == name)
        .map(|(id, _)| *id)
        .ok_or_else(|| ConfigError::RoleNotFound(name.to_string()))
}
