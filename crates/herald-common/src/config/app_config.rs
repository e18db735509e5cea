//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).
//! Missing or malformed required values are fatal: the process refuses to start
//! rather than run in a degraded, silently no-op mode.

use herald_core::{
    ActivityComposition, ActivityFilter, Decorator, Snowflake, DEFAULT_LIVE_MARKER, MAX_MARKER_CHARS,
};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub discord: DiscordConfig,
    pub twitch: TwitchConfig,
    /// `None` selects the in-process store (never in production)
    pub database: Option<DatabaseConfig>,
    pub roles: RoleConfig,
    pub tracking: TrackingConfig,
    pub scheduler: SchedulerConfig,
    /// `None` disables the health endpoint
    pub health: Option<ServerConfig>,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Discord bot credentials and the single managed guild
#[derive(Clone)]
pub struct DiscordConfig {
    pub token: String,
    pub guild_id: Snowflake,
}

impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &"<redacted>")
            .field("guild_id", &self.guild_id)
            .finish()
    }
}

/// Twitch Helix client configuration
#[derive(Clone)]
pub struct TwitchConfig {
    pub client_id: String,
    pub client_secret: String,
    pub api_base: String,
    pub auth_base: String,
    pub timeout_secs: u64,
}

impl TwitchConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl fmt::Debug for TwitchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwitchConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("auth_base", &self.auth_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Names of the managed roles, resolved against the guild at startup
#[derive(Debug, Clone, Deserialize)]
pub struct RoleConfig {
    #[serde(default = "default_stream_role_name")]
    pub stream_role_name: String,
    #[serde(default = "default_activity_role_name")]
    pub activity_role_name: String,
}

/// What counts as live and as engaged
#[derive(Debug, Clone, Deserialize)]
pub struct TrackingConfig {
    /// Presence activity name matched case-insensitively as a substring
    #[serde(default = "default_tracked_activity")]
    pub tracked_activity: String,
    #[serde(default = "default_live_marker")]
    pub live_marker: String,
    /// When set, only streams in this category count as live
    #[serde(default)]
    pub category_filter: Option<String>,
    /// When true, being live also counts as engaged in the activity
    #[serde(default)]
    pub activity_includes_live: bool,
}

impl TrackingConfig {
    #[must_use]
    pub fn activity_filter(&self) -> ActivityFilter {
        match &self.category_filter {
            Some(category) => ActivityFilter::ExactCategoryMatch(category.clone()),
            None => ActivityFilter::None,
        }
    }

    #[must_use]
    pub fn composition(&self) -> ActivityComposition {
        if self.activity_includes_live {
            ActivityComposition::PresenceOrLive
        } else {
            ActivityComposition::PresenceOnly
        }
    }

    #[must_use]
    pub fn decorator(&self) -> Decorator {
        Decorator::new(self.live_marker.clone())
    }
}

/// Timer cadence and request spacing
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default)]
    pub member_spacing_ms: u64,
}

impl SchedulerConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    #[must_use]
    pub fn member_spacing(&self) -> Duration {
        Duration::from_millis(self.member_spacing_ms)
    }
}

/// Server configuration (health endpoint)
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Default value functions
fn default_app_name() -> String {
    "live-herald".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_min_connections() -> u32 {
    1
}

fn default_stream_role_name() -> String {
    "En stream".to_string()
}

fn default_activity_role_name() -> String {
    "En train de jouer".to_string()
}

fn default_tracked_activity() -> String {
    "Star Citizen".to_string()
}

fn default_live_marker() -> String {
    DEFAULT_LIVE_MARKER.to_string()
}

fn default_interval_secs() -> u64 {
    120 // 2 minutes
}

fn default_twitch_api_base() -> String {
    "https://api.twitch.tv".to_string()
}

fn default_twitch_auth_base() -> String {
    "https://id.twitch.tv".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// # Errors
    /// Returns an error if required keys are missing or invalid
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::MissingVar(key));

        let env = match get("APP_ENV") {
            Some(raw) => Environment::parse(&raw)
                .ok_or_else(|| ConfigError::InvalidValue("APP_ENV", raw))?,
            None => default_env(),
        };

        let guild_raw = required("DISCORD_GUILD_ID")?;
        let guild_id = match Snowflake::parse(&guild_raw) {
            Ok(id) if !id.is_zero() => id,
            _ => return Err(ConfigError::InvalidValue("DISCORD_GUILD_ID", guild_raw)),
        };

        // A longer marker would be cut by nickname truncation and never match again
        let live_marker = match get("LIVE_MARKER") {
            Some(raw) if raw.trim().chars().count() > MAX_MARKER_CHARS => {
                return Err(ConfigError::InvalidValue("LIVE_MARKER", raw));
            }
            Some(raw) => raw.trim().to_string(),
            None => default_live_marker(),
        };

        let database = match get("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: parse_or(&get, "DATABASE_MIN_CONNECTIONS", default_min_connections)?,
            }),
            None if env.is_production() => return Err(ConfigError::MissingVar("DATABASE_URL")),
            None => None,
        };

        let health = match get("HEALTH_PORT") {
            Some(raw) => Some(ServerConfig {
                host: get("HEALTH_HOST").unwrap_or_else(default_host),
                port: raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("HEALTH_PORT", raw))?,
            }),
            None => None,
        };

        let interval_secs = parse_or(&get, "RECONCILE_INTERVAL_SECS", default_interval_secs)?;
        if interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "RECONCILE_INTERVAL_SECS",
                "0".to_string(),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: get("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            discord: DiscordConfig {
                token: required("DISCORD_TOKEN")?,
                guild_id,
            },
            twitch: TwitchConfig {
                client_id: required("TWITCH_CLIENT_ID")?,
                client_secret: get("TWITCH_CLIENT_SECRET")
                    .or_else(|| get("TWITCH_SECRET"))
                    .ok_or(ConfigError::MissingVar("TWITCH_CLIENT_SECRET"))?,
                api_base: get("TWITCH_API_BASE").unwrap_or_else(default_twitch_api_base),
                auth_base: get("TWITCH_AUTH_BASE").unwrap_or_else(default_twitch_auth_base),
                timeout_secs: parse_or(&get, "HTTP_TIMEOUT_SECS", default_http_timeout_secs)?,
            },
            database,
            roles: RoleConfig {
                stream_role_name: get("STREAM_ROLE_NAME").unwrap_or_else(default_stream_role_name),
                activity_role_name: get("ACTIVITY_ROLE_NAME")
                    .unwrap_or_else(default_activity_role_name),
            },
            tracking: TrackingConfig {
                tracked_activity: get("TRACKED_ACTIVITY").unwrap_or_else(default_tracked_activity),
                live_marker,
                category_filter: get("STREAM_CATEGORY_FILTER").map(|s| s.trim().to_string()),
                activity_includes_live: parse_bool_or(&get, "ACTIVITY_INCLUDES_LIVE", false)?,
            },
            scheduler: SchedulerConfig {
                interval_secs,
                member_spacing_ms: parse_or(&get, "MEMBER_SPACING_MS", || 0)?,
            },
            health,
        })
    }
}

fn parse_or<G, T, D>(get: &G, key: &'static str, default: D) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    D: FnOnce() -> T,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

fn parse_bool_or<G>(get: &G, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue(key, raw)),
        },
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("Role '{0}' not found in guild")]
    RoleNotFound(String),

    #[error("Guild {0} is not reachable with the configured token")]
    GuildUnreachable(Snowflake),
}
