//! Response DTOs
//!
//! Command replies render to the French text members see; health responses
//! serialize to JSON for the health endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use herald_core::{LiveStatus, StreamProbe};

use crate::services::PassReport;

// ============================================================================
// Command Responses
// ============================================================================

/// Reply to `/link` and `/statut`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkStatusResponse {
    pub twitch_username: String,
    pub status: LiveStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl LinkStatusResponse {
    pub fn new(twitch_username: impl Into<String>, status: LiveStatus, probe: &StreamProbe) -> Self {
        let category = match probe {
            StreamProbe::Live(stream) if status == LiveStatus::Live => stream.category.clone(),
            _ => None,
        };
        Self {
            twitch_username: twitch_username.into(),
            status,
            category,
        }
    }

    /// Ephemeral message text
    pub fn message(&self) -> String {
        let mut text = format!(
            "Twitch lié : `{}`\nStatut : {}",
            self.twitch_username,
            status_label(self.status)
        );
        if let Some(category) = &self.category {
            text.push_str(&format!(" ({category})"));
        }
        text
    }
}

/// Reply to `/unlink`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnlinkResponse {
    pub twitch_username: Option<String>,
}

impl UnlinkResponse {
    pub fn message(&self) -> String {
        match &self.twitch_username {
            Some(handle) => format!("Compte Twitch `{handle}` délié."),
            None => "Aucun compte Twitch n'est lié.".to_string(),
        }
    }
}

pub fn status_label(status: LiveStatus) -> &'static str {
    match status {
        LiveStatus::Live => "🔴 En live",
        LiveStatus::NotLive => "⚫ Hors ligne",
        LiveStatus::Unknown => "❔ Indisponible",
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_pass: Option<PassReport>,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub gateway: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, gateway_connected: bool, last_pass: Option<PassReport>) -> Self {
        let all_healthy = database_healthy && gateway_connected;
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
                gateway: if gateway_connected { "connected" } else { "disconnected" }.to_string(),
            },
            last_pass,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
