//! Integration test utilities for the live-status reconciler
//!
//! This crate provides fixtures and a harness for running end-to-end
//! reconciliation scenarios without Discord, Twitch or PostgreSQL.

pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
