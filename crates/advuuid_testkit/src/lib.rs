//! # advuuid Testkit
//!
//! Test utilities for advuuid.
//!
//! This crate provides:
//! - An in-memory [`DocumentStore`](advuuid_core::DocumentStore) with fault
//!   injection, latency and call counters
//! - Content-type schema fixtures covering every option combination
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use advuuid_testkit::prelude::*;
//!
//! #[tokio::test]
//! async fn creates_get_an_identifier() {
//!     let harness = Harness::new(&["en", "fr"]);
//!     let mut event = OperationEvent::create(ARTICLE, payload(json!({ "title": "Hi" })));
//!     harness.resolver.resolve(&mut event).await.unwrap();
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod store;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::store::*;
}

pub use fixtures::*;
pub use generators::*;
pub use store::*;
