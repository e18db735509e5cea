//! Data transfer objects for command requests and responses
//!
//! - Request DTOs with validation for command inputs
//! - Response DTOs rendered as command replies or health JSON

pub mod requests;
pub mod responses;

pub use requests::LinkRequest;
pub use responses::{
    status_label, HealthChecks, HealthResponse, LinkStatusResponse, ReadinessResponse,
    UnlinkResponse,
};
