//! Error types for constraint scheduling operations.

use thiserror::Error;

/// Errors produced by scheduler components.
#[derive(Debug, Error)]
pub enum ConstraintError {
    /// Request failed validation; nothing was written.
    #[error("invalid request: {0}")]
    Validation(String),
    /// No constraint exists with the given id or name.
    #[error("unknown resource constraint: {0}")]
    UnknownConstraint(String),
    /// No instance exists with the given id.
    #[error("resource constraint instance not found: {0}")]
    InstanceNotFound(String),
    /// The execution status oracle could not answer.
    #[error("status lookup failed for {entity}: {reason}")]
    StatusLookup {
        /// Release entity whose status was requested.
        entity: String,
        /// Failure reported by the oracle.
        reason: String,
    },
    /// A constraint with the same account and name is already registered.
    #[error("already exists: {0}")]
    Duplicate(String),
    /// A concurrent writer changed the records first.
    #[error("concurrent modification: {0}")]
    Conflict(String),
    /// Backend-specific failure with context.
    #[error("backend error: {0}")]
    Backend(String),
}

impl ConstraintError {
    /// Whether re-running the operation from persisted state may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::StatusLookup { .. })
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
