//! App access token cache
//!
//! Client-credentials tokens are shared by every probe. Only one refresh runs
//! at a time; callers that queue behind it reuse the token it fetched.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument};

use crate::config::HelixConfig;
use crate::error::{HelixError, HelixResult};

/// Used when Twitch omits `expires_in`
const DEFAULT_LIFETIME: Duration = Duration::from_secs(3600);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Shared app access token with single-writer refresh
#[derive(Debug, Default)]
pub struct TokenCache {
    current: RwLock<Option<CachedToken>>,
    refresh: Mutex<()>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a valid token, fetching a new one if needed
    pub(crate) async fn get(&self, http: &reqwest::Client, config: &HelixConfig) -> HelixResult<String> {
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let _guard = self.refresh.lock().await;
        // Another caller may have refreshed while we waited
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let fetched = fetch_token(http, config).await?;
        let value = fetched.value.clone();
        *self.current.write().await = Some(fetched);
        Ok(value)
    }

    /// Drop `stale` so the next `get` refreshes. A newer token is left alone.
    pub(crate) async fn invalidate(&self, stale: &str) {
        let mut current = self.current.write().await;
        if current.as_ref().is_some_and(|t| t.value == stale) {
            debug!("Invalidating rejected app access token");
            *current = None;
        }
    }

    async fn cached(&self) -> Option<String> {
        self.current
            .read()
            .await
            .as_ref()
            .filter(|t| t.is_fresh())
            .map(|t| t.value.clone())
    }
}

#[instrument(skip_all, fields(url = %config.token_url()))]
async fn fetch_token(http: &reqwest::Client, config: &HelixConfig) -> HelixResult<CachedToken> {
    let response = http
        .post(config.token_url())
        .query(&[
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(HelixError::TokenRequest {
            status: status.as_u16(),
            body,
        });
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| HelixError::Decode(e.to_string()))?;

    let lifetime = token
        .expires_in
        .map_or(DEFAULT_LIFETIME, Duration::from_secs)
        .saturating_sub(config.expiry_margin);

    info!(expires_in_secs = lifetime.as_secs(), "Obtained Twitch app access token");

    Ok(CachedToken {
        value: token.access_token,
        expires_at: Instant::now() + lifetime,
    })
}
