//! Timer trigger
//!
//! Runs a full reconciliation pass on a fixed cadence. Passes never overlap:
//! the next tick waits for the running pass, and ticks missed meanwhile are
//! dropped rather than bunched up.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use herald_service::{PassReport, ReconciliationService, ServiceContext};

use crate::state::RuntimeStatus;

/// Periodic reconciliation of every linked member
pub struct Scheduler {
    services: Arc<ServiceContext>,
    interval: Duration,
    runtime: RuntimeStatus,
}

impl Scheduler {
    pub fn new(services: Arc<ServiceContext>, interval: Duration, runtime: RuntimeStatus) -> Self {
        Self {
            services,
            interval,
            runtime,
        }
    }

    /// Start the timer loop on the runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Tick forever; the first pass runs immediately
    pub async fn run(self) {
        info!(interval_secs = self.interval.as_secs(), "Scheduler started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }

    /// Run one pass and record it for the health endpoint
    pub async fn tick(&self) -> Option<PassReport> {
        match ReconciliationService::new(&self.services).run_pass().await {
            Ok(report) => {
                self.runtime.record_pass(report.clone());
                Some(report)
            }
            Err(e) => {
                // Link table unreadable; the next tick retries
                error!(error = %e, "Reconciliation pass aborted");
                None
            }
        }
    }
}
