//! # advuuid Core
//!
//! Stable, format-constrained identifiers for documents that exist as many
//! physical rows (one per locale and publication state).
//!
//! This crate provides:
//! - Classification of identifier-managed attributes from host schemas
//! - An immutable registry of managed content types built at start-up
//! - The consistency resolver run on every intercepted create/update
//! - Aggregated validation failures
//! - Per-document assignment locks for concurrent locale creation
//!
//! ## Key Invariants
//!
//! - An identifier is generated once per logical document and then only
//!   propagated to its other locale/publication variants
//! - Locked identifiers (`regenerateDisabled`) are never overwritten by
//!   client-supplied values
//! - The resolver only reads from the store; the write stays with the host
//!
//! ## Usage
//!
//! ```rust,ignore
//! use advuuid_core::{Config, ManagedRegistry, OperationEvent, Resolver};
//! use std::sync::Arc;
//!
//! let config = Config::default();
//! let registry = Arc::new(ManagedRegistry::build(&schemas, &config));
//! let resolver = Resolver::new(registry, Arc::new(store), config);
//!
//! let mut event = OperationEvent::create("api::article.article", payload);
//! resolver.resolve(&mut event).await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod classify;
mod config;
mod error;
mod locks;
mod registry;
mod resolver;
mod schema;
mod store;
mod strategy;
#[cfg(test)]
mod test_store;
mod types;
mod validation;

pub use classify::{classify, ManagedAttributeConfig};
pub use config::{Config, LookupErrorPolicy, DEFAULT_MARKER};
pub use error::{ResolveError, ResolveResult, StoreError, StoreResult};
pub use locks::{DocumentGuard, DocumentLocks};
pub use registry::ManagedRegistry;
pub use resolver::{Action, AttributeOutcome, Check, Resolution, Resolver};
pub use schema::{AttributeOptions, AttributeSchema, ContentTypeSchema, I18nOptions, PluginOptions};
pub use store::{DocumentStore, Lookup};
pub use strategy::{Found, Source, Strategy};
pub use types::{
    is_empty, text, DocumentId, OperationEvent, OperationKind, PublicationState, Row, RowId,
    Selector,
};
pub use validation::{
    ValidationFailure, Violation, ViolationCollector, ViolationKind, AGGREGATE_MESSAGE,
    FORMAT_INVALID_MESSAGE,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
