//! Helix HTTP client

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{instrument, warn};

use herald_core::LiveStream;

use crate::config::{HelixConfig, MAX_LOGINS_PER_REQUEST};
use crate::error::{HelixError, HelixResult};
use crate::token::TokenCache;

/// One entry of `GET /helix/streams`
#[derive(Debug, Clone, Deserialize)]
pub struct StreamData {
    pub user_login: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub title: String,
    /// `"live"` for live streams, empty string on error states
    #[serde(default, rename = "type")]
    pub stream_type: String,
}

impl StreamData {
    pub fn is_live(&self) -> bool {
        self.stream_type.eq_ignore_ascii_case("live")
    }
}

impl From<StreamData> for LiveStream {
    fn from(data: StreamData) -> Self {
        LiveStream {
            user_login: data.user_login.to_ascii_lowercase(),
            category: Some(data.game_name).filter(|c| !c.is_empty()),
            title: data.title,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StreamsResponse {
    data: Vec<StreamData>,
}

/// Twitch Helix client sharing one app access token
pub struct HelixClient {
    http: reqwest::Client,
    config: HelixConfig,
    tokens: TokenCache,
}

impl HelixClient {
    /// Build a client with the configured request timeout
    pub fn new(config: HelixConfig) -> HelixResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("live-herald/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config,
            tokens: TokenCache::new(),
        })
    }

    pub fn config(&self) -> &HelixConfig {
        &self.config
    }

    /// Fetch the live streams among `logins` (at most 100 per call).
    ///
    /// Logins that are offline or unknown to Twitch are simply absent. A 401
    /// invalidates the cached token and the request is retried once.
    #[instrument(skip(self), fields(count = logins.len()))]
    pub async fn get_streams(&self, logins: &[String]) -> HelixResult<Vec<StreamData>> {
        if logins.is_empty() {
            return Ok(Vec::new());
        }
        if logins.len() > MAX_LOGINS_PER_REQUEST {
            return Err(HelixError::Decode(format!(
                "{} logins exceed the per-request limit of {MAX_LOGINS_PER_REQUEST}",
                logins.len()
            )));
        }

        let token = self.tokens.get(&self.http, &self.config).await?;
        match self.request_streams(&token, logins).await {
            Err(HelixError::Unauthorized) => {
                warn!("App access token rejected, refreshing and retrying once");
                self.tokens.invalidate(&token).await;
                let token = self.tokens.get(&self.http, &self.config).await?;
                self.request_streams(&token, logins).await
            }
            other => other,
        }
    }

    async fn request_streams(&self, token: &str, logins: &[String]) -> HelixResult<Vec<StreamData>> {
        let mut query: Vec<(&str, &str)> = Vec::with_capacity(logins.len() + 1);
        query.push(("first", "100"));
        query.extend(logins.iter().map(|login| ("user_login", login.as_str())));

        let response = self
            .http
            .get(self.config.streams_url())
            .header("Client-Id", &self.config.client_id)
            .bearer_auth(token)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(HelixError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HelixError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: StreamsResponse = response
            .json()
            .await
            .map_err(|e| HelixError::Decode(e.to_string()))?;

        Ok(payload.data.into_iter().filter(StreamData::is_live).collect())
    }
}
