//! NicknameRecord entity <-> model mapper

use herald_core::entities::NicknameRecord;
use herald_core::value_objects::Snowflake;

use crate::models::NicknameHistoryModel;

impl From<NicknameHistoryModel> for NicknameRecord {
    fn from(model: NicknameHistoryModel) -> Self {
        NicknameRecord {
            member_id: Snowflake::new(model.discord_id),
            saved_nickname: model.saved_nickname,
            saved_at: model.saved_at,
        }
    }
}
