//! Document store collaborator.

use crate::config::LookupErrorPolicy;
use crate::error::{ResolveError, ResolveResult, StoreError, StoreResult};
use crate::types::{DocumentId, PublicationState, Row, Selector};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Read-only view of the host document store.
///
/// The resolver only ever reads through this trait; the write itself stays
/// with the host.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Finds at most one row of `document_id` in `state`.
    ///
    /// With `locale` set only that locale matches; without it the store's
    /// default locale is used.
    async fn find_sibling(
        &self,
        content_type: &str,
        document_id: &DocumentId,
        locale: Option<&str>,
        state: PublicationState,
    ) -> StoreResult<Option<Row>>;

    /// Finds the row currently matching an update selector.
    async fn find_current_row(
        &self,
        content_type: &str,
        selector: &Selector,
    ) -> StoreResult<Option<Row>>;

    /// Lists configured locale codes in order.
    async fn list_configured_locales(&self) -> StoreResult<Vec<String>>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    async fn find_sibling(
        &self,
        content_type: &str,
        document_id: &DocumentId,
        locale: Option<&str>,
        state: PublicationState,
    ) -> StoreResult<Option<Row>> {
        (**self)
            .find_sibling(content_type, document_id, locale, state)
            .await
    }

    async fn find_current_row(
        &self,
        content_type: &str,
        selector: &Selector,
    ) -> StoreResult<Option<Row>> {
        (**self).find_current_row(content_type, selector).await
    }

    async fn list_configured_locales(&self) -> StoreResult<Vec<String>> {
        (**self).list_configured_locales().await
    }
}

/// Outcome of one lookup, with failure kept distinct from absence.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// The lookup returned a value.
    Found(T),
    /// The lookup succeeded and returned nothing.
    NotFound,
    /// The store failed.
    Failed(StoreError),
}

impl<T> Lookup<T> {
    /// Returns true if the store failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Lookup::Failed(_))
    }

    /// Applies `policy` to a failed lookup.
    ///
    /// Under [`LookupErrorPolicy::TreatAsNotFound`] the failure is logged and
    /// reported as `Ok(None)`; under [`LookupErrorPolicy::Escalate`] it
    /// becomes [`ResolveError::Lookup`].
    pub fn apply(
        self,
        policy: LookupErrorPolicy,
        content_type: &str,
        operation: &'static str,
    ) -> ResolveResult<Option<T>> {
        match self {
            Lookup::Found(value) => Ok(Some(value)),
            Lookup::NotFound => Ok(None),
            Lookup::Failed(source) => match policy {
                LookupErrorPolicy::TreatAsNotFound => {
                    warn!(
                        content_type,
                        operation,
                        error = %source,
                        "identifier lookup failed, continuing as not found"
                    );
                    Ok(None)
                }
                LookupErrorPolicy::Escalate => Err(ResolveError::Lookup {
                    content_type: content_type.to_string(),
                    operation,
                    source,
                }),
            },
        }
    }
}

impl<T> From<StoreResult<Option<T>>> for Lookup<T> {
    fn from(result: StoreResult<Option<T>>) -> Self {
        match result {
            Ok(Some(value)) => Lookup::Found(value),
            Ok(None) => Lookup::NotFound,
            Err(e) => Lookup::Failed(e),
        }
    }
}
