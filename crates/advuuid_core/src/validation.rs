//! Aggregation of per-attribute validation failures.
//!
//! Every managed attribute of an event is checked before anything is
//! reported, so a caller sees all offending attributes at once instead of
//! fixing them one round-trip at a time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message attached to the aggregate failure.
pub const AGGREGATE_MESSAGE: &str = "You have some issues";

/// Message attached to a format violation.
pub const FORMAT_INVALID_MESSAGE: &str = "The UUID format is invalid.";

/// Category of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// The final value does not match the configured format.
    FormatInvalid,
}

/// One invalid attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Attribute name the violation applies to.
    pub path: String,
    /// Violation category.
    pub kind: ViolationKind,
    /// Human-readable message.
    pub message: String,
}

impl Violation {
    /// Creates a format violation for `attribute`.
    pub fn format_invalid(attribute: impl Into<String>) -> Self {
        Self {
            path: attribute.into(),
            kind: ViolationKind::FormatInvalid,
            message: FORMAT_INVALID_MESSAGE.to_string(),
        }
    }
}

/// Aggregate failure listing every invalid attribute of one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// Summary message.
    pub message: String,
    /// Violations in attribute order.
    pub violations: Vec<Violation>,
}

impl ValidationFailure {
    /// Returns the attribute names that failed, in order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.path.as_str())
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.message)?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} ({})", violation.path, violation.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// Collects violations while an event is resolved.
#[derive(Debug, Default)]
pub struct ViolationCollector {
    violations: Vec<Violation>,
}

impl ViolationCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation.
    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Number of violations recorded so far.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Finishes collection, failing once with every recorded violation.
    pub fn finish(self) -> Result<(), ValidationFailure> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure {
                message: AGGREGATE_MESSAGE.to_string(),
                violations: self.violations,
            })
        }
    }
}
