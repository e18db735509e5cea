//! Twitch handle - normalized streaming-platform login name

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a Twitch login
pub const MAX_HANDLE_LEN: usize = 25;

/// A validated, lower-cased Twitch login.
///
/// Twitch logins are case-insensitive; storing them lower-cased keeps the
/// one-handle-one-member constraint meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TwitchHandle(String);

impl TwitchHandle {
    /// Normalize and validate user input (`"  @SomeStreamer "` -> `somestreamer`)
    pub fn parse(input: &str) -> Result<Self, HandleError> {
        let trimmed = input.trim();
        let trimmed = trimmed.strip_prefix('@').unwrap_or(trimmed);

        if trimmed.is_empty() {
            return Err(HandleError::Empty);
        }
        if trimmed.chars().count() > MAX_HANDLE_LEN {
            return Err(HandleError::TooLong(trimmed.to_string()));
        }
        if let Some(c) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
        {
            return Err(HandleError::InvalidCharacter(c));
        }

        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Get the handle as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TwitchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TwitchHandle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TwitchHandle {
    type Error = HandleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TwitchHandle> for String {
    fn from(handle: TwitchHandle) -> Self {
        handle.0
    }
}

/// Error when a handle fails validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandleError {
    #[error("handle is empty")]
    Empty,

    #[error("handle '{0}' is longer than 25 characters")]
    TooLong(String),

    #[error("handle contains invalid character '{0}'")]
    InvalidCharacter(char),
}
