//! # herald-service
//!
//! Application layer: reconciliation passes, push triggers, the action
//! executor, link commands and their DTOs.

pub mod dto;
pub mod services;

pub use services::{
    ActionExecutor, ActivityMatcher, ActivityObserver, ApplyOutcome, ExecutionReport, LinkService,
    MemberOutcome, PassReport, ReconciliationService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult,
};
