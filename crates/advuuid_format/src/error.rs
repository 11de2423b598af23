//! Error types for the format crate.

use thiserror::Error;

/// Result type for format operations.
pub type FormatResult<T> = Result<T, FormatError>;

/// Errors that can occur while compiling a format body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The body is not a valid regular expression.
    #[error("invalid format pattern {pattern:?}: {message}")]
    InvalidPattern {
        /// The offending pattern body.
        pattern: String,
        /// Parser diagnostic.
        message: String,
    },

    /// The pattern parses but no string can be produced from it.
    #[error("format pattern {pattern:?} cannot produce any value")]
    Unsatisfiable {
        /// The offending pattern body.
        pattern: String,
    },
}

impl FormatError {
    /// Creates an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.to_string(),
        }
    }

    /// Creates an unsatisfiable pattern error.
    pub fn unsatisfiable(pattern: impl Into<String>) -> Self {
        Self::Unsatisfiable {
            pattern: pattern.into(),
        }
    }
}
