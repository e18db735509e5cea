//! Value objects - immutable types that represent domain concepts

mod handle;
mod snowflake;

pub use handle::{HandleError, TwitchHandle};
pub use snowflake::{Snowflake, SnowflakeParseError};
