//! Domain entities - core business objects

mod link;
mod member;
mod nickname;

pub use link::MemberLink;
pub use member::MemberSnapshot;
pub use nickname::NicknameRecord;
