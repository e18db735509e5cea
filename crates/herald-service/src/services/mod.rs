//! Reconciliation and command services
//!
//! Services borrow a [`ServiceContext`] and are created per call.

pub mod context;
pub mod error;
pub mod executor;
pub mod link;
pub mod locks;
pub mod observer;
pub mod reconcile;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use executor::{ActionExecutor, AppliedAction, ApplyOutcome, ExecutionReport};
pub use link::LinkService;
pub use locks::MemberLocks;
pub use observer::{ActivityMatcher, ActivityObserver};
pub use reconcile::{MemberOutcome, PassReport, ReconciliationService};

#[cfg(test)]
pub(crate) mod test_support;
