//! # herald-helix
//!
//! Twitch Helix client: app access token cache, batched stream lookups and
//! the `LiveStatusProbe` implementation the reconciler uses.

pub mod client;
pub mod config;
pub mod error;
pub mod probe;
pub mod token;

pub use client::{HelixClient, StreamData};
pub use config::{HelixConfig, MAX_LOGINS_PER_REQUEST};
pub use error::{HelixError, HelixResult};
pub use token::TokenCache;
