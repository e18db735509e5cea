//! Helix client configuration

use std::time::Duration;

use herald_common::TwitchConfig;

/// Largest `user_login` batch Helix accepts per request
pub const MAX_LOGINS_PER_REQUEST: usize = 100;

/// Connection settings for the Helix API and the OAuth endpoint
#[derive(Clone)]
pub struct HelixConfig {
    pub client_id: String,
    pub client_secret: String,
    /// e.g. `https://api.twitch.tv`
    pub api_base: String,
    /// e.g. `https://id.twitch.tv`
    pub auth_base: String,
    pub timeout: Duration,
    /// Tokens are treated as expired this long before Twitch says so
    pub expiry_margin: Duration,
}

impl HelixConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_base: "https://api.twitch.tv".to_string(),
            auth_base: "https://id.twitch.tv".to_string(),
            timeout: Duration::from_secs(10),
            expiry_margin: Duration::from_secs(60),
        }
    }

    /// Point both endpoints at one base URL (mock servers)
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.api_base.clone_from(&base);
        self.auth_base = base;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn streams_url(&self) -> String {
        format!("{}/helix/streams", self.api_base.trim_end_matches('/'))
    }

    pub(crate) fn token_url(&self) -> String {
        format!("{}/oauth2/token", self.auth_base.trim_end_matches('/'))
    }
}

impl From<&TwitchConfig> for HelixConfig {
    fn from(config: &TwitchConfig) -> Self {
        Self {
            api_base: config.api_base.clone(),
            auth_base: config.auth_base.clone(),
            timeout: config.timeout(),
            ..Self::new(config.client_id.clone(), config.client_secret.clone())
        }
    }
}

impl std::fmt::Debug for HelixConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelixConfig")
            .field("client_id", &self.client_id)
            .field("api_base", &self.api_base)
            .field("auth_base", &self.auth_base)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
