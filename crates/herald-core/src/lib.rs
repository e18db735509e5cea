//! # herald-core
//!
//! Domain layer containing entities, value objects, decoration rules, the
//! reconciliation engine, and the ports it talks through.
//! This crate has zero dependencies on infrastructure (database, gateway, HTTP, etc.).

pub mod decoration;
pub mod entities;
pub mod error;
pub mod reconcile;
pub mod status;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use decoration::{Decorator, DEFAULT_LIVE_MARKER, MAX_MARKER_CHARS, MAX_NICKNAME_CHARS};
pub use entities::{MemberLink, MemberSnapshot, NicknameRecord};
pub use error::DomainError;
pub use reconcile::{Action, ActionPlan, DecorationState, ReconcileEngine, ReconcilePolicy, RoleKind};
pub use status::{
    ActivityComposition, ActivityFilter, ActivityStatus, LiveStatus, LiveStream, StreamProbe,
};
pub use traits::{
    GuildPlatform, LinkRepository, LiveStatusProbe, NicknameHistoryRepository, PlatformError,
    PlatformResult, RepoResult,
};
pub use value_objects::{HandleError, Snowflake, SnowflakeParseError, TwitchHandle};
