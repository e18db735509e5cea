//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in herald-core.

mod error;
mod link;
mod nickname;

pub use link::PgLinkRepository;
pub use nickname::PgNicknameHistoryRepository;
