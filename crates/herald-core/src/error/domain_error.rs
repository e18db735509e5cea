//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{HandleError, Snowflake};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("No link found for member: {0}")]
    LinkNotFound(Snowflake),

    #[error("Member not found in guild: {0}")]
    MemberNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid handle: {0}")]
    InvalidHandle(#[from] HandleError),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Handle '{0}' is already linked to another member")]
    HandleAlreadyLinked(String),

    #[error("Nickname history already exists for member: {0}")]
    HistoryAlreadyExists(Snowflake),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for logs and command replies
    pub fn code(&self) -> &'static str {
        match self {
            Self::LinkNotFound(_) => "UNKNOWN_LINK",
            Self::MemberNotFound(_) => "UNKNOWN_MEMBER",
            Self::InvalidHandle(_) => "INVALID_HANDLE",
            Self::HandleAlreadyLinked(_) => "HANDLE_ALREADY_LINKED",
            Self::HistoryAlreadyExists(_) => "HISTORY_ALREADY_EXISTS",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::LinkNotFound(_) | Self::MemberNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidHandle(_))
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::HandleAlreadyLinked(_) | Self::HistoryAlreadyExists(_)
        )
    }
}
