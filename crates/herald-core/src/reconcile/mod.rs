//! Reconciliation engine
//!
//! Pure decision logic: given the external truths and the member's current
//! decorated state, produce the minimal corrective [`ActionPlan`]. Nothing in
//! here performs I/O.

mod engine;
mod plan;

pub use engine::{DecorationState, ReconcileEngine, ReconcilePolicy};
pub use plan::{Action, ActionPlan, RoleKind};
