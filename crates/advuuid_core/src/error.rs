//! Error types for advuuid core.

use crate::validation::ValidationFailure;
use thiserror::Error;

/// Result type for store lookups.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Errors reported by a [`DocumentStore`](crate::DocumentStore) collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The lookup did not complete in time.
    #[error("lookup timed out")]
    Timeout,

    /// Any other backend failure.
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Creates a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Returns true if the failure is likely to clear on its own.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Timeout)
    }
}

/// Errors that reject an intercepted write.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// One or more managed attributes hold an invalid value.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// A lookup failed and the policy asked for escalation.
    #[error("{operation} failed for {content_type}: {source}")]
    Lookup {
        /// Content type being resolved.
        content_type: String,
        /// Lookup that failed.
        operation: &'static str,
        /// Underlying store error.
        #[source]
        source: StoreError,
    },

    /// The event is structurally unusable.
    #[error("invalid event: {message}")]
    InvalidEvent {
        /// Why the event was rejected.
        message: String,
    },
}

impl ResolveError {
    /// Creates an invalid event error.
    pub fn invalid_event(message: impl Into<String>) -> Self {
        Self::InvalidEvent {
            message: message.into(),
        }
    }

    /// Returns the aggregate validation failure, if that is what this is.
    pub fn as_validation(&self) -> Option<&ValidationFailure> {
        match self {
            ResolveError::Validation(failure) => Some(failure),
            _ => None,
        }
    }
}
