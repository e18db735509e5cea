//! Helix client errors

use thiserror::Error;

/// Errors talking to Twitch. The probe collapses all of them into `Unknown`.
#[derive(Debug, Error)]
pub enum HelixError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Twitch rejected the app access token")]
    Unauthorized,

    #[error("Token request failed with status {status}: {body}")]
    TokenRequest { status: u16, body: String },

    #[error("Helix returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected Helix payload: {0}")]
    Decode(String),
}

impl HelixError {
    /// Whether a later attempt could succeed without operator action
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Decode(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Unauthorized | Self::TokenRequest { .. } => false,
        }
    }
}

pub type HelixResult<T> = Result<T, HelixError>;
