//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Store mutations never produce these: a missing record is a silent no-op.
/// They are raised by the catalog layer that gates whether a mutation is
/// attempted at all (validation, duplicate names, device capability refusals).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. a blank required field).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The operation collides with existing state (e.g. duplicate category name).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A requested record was not found.
    #[error("not found")]
    NotFound,

    /// A device capability (image library, ...) refused access.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// An identifier was invalid (e.g. blank).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
