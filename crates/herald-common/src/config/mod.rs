//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, DatabaseConfig, DiscordConfig, Environment, RoleConfig,
    SchedulerConfig, ServerConfig, TrackingConfig, TwitchConfig,
};
