//! Resolver configuration.

use serde::{Deserialize, Serialize};

/// Marker the host puts on identifier-managed attributes.
pub const DEFAULT_MARKER: &str = "plugin::strapi-advanced-uuid.uuid";

/// What to do when a store lookup fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LookupErrorPolicy {
    /// Log the failure and continue as if nothing was found.
    #[default]
    TreatAsNotFound,
    /// Reject the write with [`ResolveError::Lookup`](crate::ResolveError::Lookup).
    Escalate,
}

/// Configuration for classification and resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Custom field marker selecting managed attributes.
    pub marker: String,

    /// Only content types whose uid starts with this prefix are managed.
    pub content_type_prefix: Option<String>,

    /// Handling of failed lookups.
    pub lookup_errors: LookupErrorPolicy,

    /// Whether `resolve_serialized` takes a per-document lock.
    pub serialize_per_document: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            content_type_prefix: None,
            lookup_errors: LookupErrorPolicy::TreatAsNotFound,
            serialize_per_document: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the managed attribute marker.
    #[must_use]
    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Restricts management to content types with this uid prefix.
    #[must_use]
    pub fn content_type_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.content_type_prefix = Some(prefix.into());
        self
    }

    /// Sets the lookup failure policy.
    #[must_use]
    pub const fn lookup_errors(mut self, policy: LookupErrorPolicy) -> Self {
        self.lookup_errors = policy;
        self
    }

    /// Sets whether assignments are serialized per document.
    #[must_use]
    pub const fn serialize_per_document(mut self, value: bool) -> Self {
        self.serialize_per_document = value;
        self
    }

    /// Returns true if `uid` passes the content type prefix filter.
    pub fn manages_content_type(&self, uid: &str) -> bool {
        self.content_type_prefix
            .as_deref()
            .map_or(true, |prefix| uid.starts_with(prefix))
    }
}
