//! Ports - interfaces the domain needs from the outside world

mod platform;
mod probe;
mod repositories;

pub use platform::{GuildPlatform, PlatformError, PlatformResult};
pub use probe::LiveStatusProbe;
pub use repositories::{LinkRepository, NicknameHistoryRepository, RepoResult};
