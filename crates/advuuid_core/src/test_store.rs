//! Minimal store for unit tests.

use crate::error::{StoreError, StoreResult};
use crate::store::DocumentStore;
use crate::types::{DocumentId, PublicationState, Row, Selector};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub(crate) struct StubStore {
    pub rows: Vec<Row>,
    pub locales: Vec<String>,
    pub fail: bool,
    pub lookups: AtomicUsize,
}

impl StubStore {
    pub fn new(locales: &[&str], rows: Vec<Row>) -> Self {
        Self {
            rows,
            locales: locales.iter().map(|l| l.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn check(&self) -> StoreResult<()> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(StoreError::unavailable("stub"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for StubStore {
    async fn find_sibling(
        &self,
        _content_type: &str,
        document_id: &DocumentId,
        locale: Option<&str>,
        state: PublicationState,
    ) -> StoreResult<Option<Row>> {
        self.check()?;
        let locale = locale.or(self.locales.first().map(String::as_str));
        Ok(self
            .rows
            .iter()
            .find(|r| {
                r.document_id.as_ref() == Some(document_id)
                    && r.state == state
                    && r.locale.as_deref() == locale
            })
            .cloned())
    }

    async fn find_current_row(
        &self,
        _content_type: &str,
        selector: &Selector,
    ) -> StoreResult<Option<Row>> {
        self.check()?;
        Ok(self
            .rows
            .iter()
            .find(|r| {
                (selector.id.is_none() || r.id == selector.id)
                    && (selector.document_id.is_none() || r.document_id == selector.document_id)
                    && (selector.locale.is_none() || r.locale == selector.locale)
            })
            .cloned())
    }

    async fn list_configured_locales(&self) -> StoreResult<Vec<String>> {
        self.check()?;
        Ok(self.locales.clone())
    }
}
