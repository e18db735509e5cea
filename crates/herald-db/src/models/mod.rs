//! Database models - SQLx-compatible structs for PostgreSQL tables

mod link;
mod nickname;

pub use link::LinkModel;
pub use nickname::NicknameHistoryModel;
