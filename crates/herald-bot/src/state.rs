//! Bot state
//!
//! Shared between the gateway event handler, the scheduler and the health
//! endpoint.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use sqlx::PgPool;

use herald_core::Snowflake;
use herald_service::{PassReport, ServiceContext};

/// Bot application state
#[derive(Clone)]
pub struct BotState {
    /// Service context with stores, adapters and reconciliation state
    services: Arc<ServiceContext>,
    /// The one guild this bot manages
    guild_id: Snowflake,
    /// Liveness signals read by the health endpoint
    runtime: RuntimeStatus,
}

impl BotState {
    pub fn new(services: ServiceContext, guild_id: Snowflake, runtime: RuntimeStatus) -> Self {
        Self {
            services: Arc::new(services),
            guild_id,
            runtime,
        }
    }

    /// Get the service context
    pub fn services(&self) -> &ServiceContext {
        &self.services
    }

    /// Shared handle to the service context, for spawned tasks
    pub fn services_handle(&self) -> Arc<ServiceContext> {
        Arc::clone(&self.services)
    }

    pub fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    pub fn runtime(&self) -> &RuntimeStatus {
        &self.runtime
    }
}

impl std::fmt::Debug for BotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotState")
            .field("guild_id", &self.guild_id)
            .field("services", &self.services)
            .finish_non_exhaustive()
    }
}

/// Process health as seen from the outside
#[derive(Clone, Default)]
pub struct RuntimeStatus {
    gateway_connected: Arc<AtomicBool>,
    last_pass: Arc<RwLock<Option<PassReport>>>,
    /// `None` when running on the in-memory store
    pool: Option<PgPool>,
}

impl RuntimeStatus {
    pub fn new(pool: Option<PgPool>) -> Self {
        Self {
            pool,
            ..Self::default()
        }
    }

    pub fn set_gateway_connected(&self, connected: bool) {
        self.gateway_connected.store(connected, Ordering::Release);
    }

    pub fn gateway_connected(&self) -> bool {
        self.gateway_connected.load(Ordering::Acquire)
    }

    pub fn record_pass(&self, report: PassReport) {
        *self.last_pass.write() = Some(report);
    }

    pub fn last_pass(&self) -> Option<PassReport> {
        self.last_pass.read().clone()
    }

    /// Database reachable; always true for the in-memory store
    pub async fn database_healthy(&self) -> bool {
        match &self.pool {
            Some(pool) => pool.acquire().await.is_ok(),
            None => true,
        }
    }
}
