//! Health endpoint
//!
//! Liveness and readiness probes, served only when a health port is
//! configured.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use herald_common::{AppError, ServerConfig};
use herald_service::dto::{HealthResponse, ReadinessResponse};

use crate::state::RuntimeStatus;

/// Create the health router
pub fn create_router(status: RuntimeStatus) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .layer(TraceLayer::new_for_http())
        .with_state(status)
}

/// Basic health check (liveness probe)
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness: database reachable and gateway connected
///
/// GET /health/ready
pub async fn readiness_check(
    State(status): State<RuntimeStatus>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let response = ReadinessResponse::ready(
        status.database_healthy().await,
        status.gateway_connected(),
        status.last_pass(),
    );
    let code = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(response))
}

/// Bind and serve until the process exits
pub async fn serve(config: &ServerConfig, status: RuntimeStatus) -> Result<(), AppError> {
    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| {
            AppError::internal(
                anyhow::Error::new(e).context(format!("Failed to bind health endpoint to {addr}")),
            )
        })?;

    tracing::info!("Health endpoint listening on http://{}/health", addr);

    axum::serve(listener, create_router(status))
        .await
        .map_err(|e| AppError::internal(anyhow::Error::new(e).context("Health server error")))
}
