//! In-memory document store.
//!
//! Implements [`DocumentStore`] over a vector of rows, with call counters,
//! fault injection and optional per-lookup latency so tests can provoke
//! interleavings.

use advuuid_core::{
    DocumentId, DocumentStore, OperationEvent, OperationKind, PublicationState, Row, RowId,
    Selector, StoreError, StoreResult,
};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// A row tagged with its content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRow {
    /// Content type uid.
    pub content_type: String,
    /// The row.
    #[serde(flatten)]
    pub row: Row,
}

/// Serializable store contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Configured locales; the first one is the default.
    #[serde(default)]
    pub locales: Vec<String>,
    /// Stored rows.
    #[serde(default)]
    pub rows: Vec<StoredRow>,
}

/// Lookup call counters.
#[derive(Debug, Default)]
pub struct CallCounts {
    sibling: AtomicUsize,
    current_row: AtomicUsize,
    locales: AtomicUsize,
}

impl CallCounts {
    /// Number of `find_sibling` calls.
    pub fn sibling(&self) -> usize {
        self.sibling.load(Ordering::SeqCst)
    }

    /// Number of `find_current_row` calls.
    pub fn current_row(&self) -> usize {
        self.current_row.load(Ordering::SeqCst)
    }

    /// Number of `list_configured_locales` calls.
    pub fn locales(&self) -> usize {
        self.locales.load(Ordering::SeqCst)
    }

    /// Total number of lookups.
    pub fn total(&self) -> usize {
        self.sibling() + self.current_row() + self.locales()
    }
}

/// An in-memory [`DocumentStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<StoredRow>>,
    locales: RwLock<Vec<String>>,
    fault: Mutex<Option<StoreError>>,
    latency: Mutex<Option<Duration>>,
    next_id: AtomicU64,
    calls: CallCounts,
}

impl MemoryStore {
    /// Creates an empty store with no locales.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            ..Self::default()
        }
    }

    /// Creates an empty store with `locales`; the first is the default.
    pub fn with_locales(locales: &[&str]) -> Self {
        let store = Self::new();
        *store.locales.write() = locales.iter().map(|l| l.to_string()).collect();
        store
    }

    /// Loads a snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let store = Self::new();
        *store.locales.write() = snapshot.locales;
        for stored in snapshot.rows {
            store.insert(&stored.content_type, stored.row);
        }
        store
    }

    /// Returns the current contents.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            locales: self.locales.read().clone(),
            rows: self.rows.read().clone(),
        }
    }

    /// Returns the default locale.
    pub fn default_locale(&self) -> Option<String> {
        self.locales.read().first().cloned()
    }

    /// Inserts a row, assigning an ID if it has none.
    pub fn insert(&self, content_type: &str, mut row: Row) -> RowId {
        let id = match row.id {
            Some(id) => {
                self.next_id.fetch_max(id.as_u64() + 1, Ordering::SeqCst);
                id
            }
            None => RowId::new(self.next_id.fetch_add(1, Ordering::SeqCst)),
        };
        row.id = Some(id);
        self.rows.write().push(StoredRow {
            content_type: content_type.to_string(),
            row,
        });
        id
    }

    /// Returns every row of `content_type`.
    pub fn rows(&self, content_type: &str) -> Vec<Row> {
        self.rows
            .read()
            .iter()
            .filter(|s| s.content_type == content_type)
            .map(|s| s.row.clone())
            .collect()
    }

    /// Returns the row with `id`.
    pub fn get(&self, id: RowId) -> Option<Row> {
        self.rows
            .read()
            .iter()
            .find(|s| s.row.id == Some(id))
            .map(|s| s.row.clone())
    }

    /// Persists a resolved event the way the host would.
    ///
    /// Creates insert a new row from the payload hints; updates merge the
    /// payload into the selected row. Returns the written row.
    pub fn commit(&self, event: &OperationEvent) -> Option<Row> {
        match event.kind {
            OperationKind::Create => {
                let row = Row {
                    id: None,
                    document_id: event.document_id.clone(),
                    locale: event.locale.clone().or_else(|| self.default_locale()),
                    state: PublicationState::from_flag(event.published),
                    fields: event.attributes.clone(),
                };
                let id = self.insert(&event.content_type, row);
                self.get(id)
            }
            OperationKind::Update => {
                let selector = event.selector.clone().unwrap_or_default();
                let default_locale = self.default_locale();
                let mut rows = self.rows.write();
                let stored = rows.iter_mut().find(|s| {
                    s.content_type == event.content_type
                        && matches_selector(&s.row, &selector, default_locale.as_deref())
                })?;
                for (name, value) in &event.attributes {
                    stored.row.fields.insert(name.clone(), value.clone());
                }
                Some(stored.row.clone())
            }
        }
    }

    /// Makes every subsequent lookup fail with `error`, or clears the fault.
    pub fn fail_with(&self, error: Option<StoreError>) {
        *self.fault.lock() = error;
    }

    /// Delays every lookup by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.lock() = latency;
    }

    /// Lookup call counters.
    pub fn calls(&self) -> &CallCounts {
        &self.calls
    }

    async fn enter(&self, counter: &AtomicUsize) -> StoreResult<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        match self.fault.lock().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn matches_selector(row: &Row, selector: &Selector, default_locale: Option<&str>) -> bool {
    if selector.id.is_some() && row.id != selector.id {
        return false;
    }
    if let Some(document_id) = &selector.document_id {
        if row.document_id.as_ref() != Some(document_id) {
            return false;
        }
    }
    // Without a row ID the store resolves a missing locale to the default.
    let locale = selector
        .locale
        .as_deref()
        .or(if selector.id.is_none() { default_locale } else { None });
    if locale.is_some() && row.locale.as_deref() != locale {
        return false;
    }
    if let Some(published) = selector.published {
        if row.state != PublicationState::from_flag(Some(published)) {
            return false;
        }
    }
    true
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_sibling(
        &self,
        content_type: &str,
        document_id: &DocumentId,
        locale: Option<&str>,
        state: PublicationState,
    ) -> StoreResult<Option<Row>> {
        self.enter(&self.calls.sibling).await?;
        let default_locale = self.default_locale();
        let locale = locale.or(default_locale.as_deref());
        Ok(self
            .rows
            .read()
            .iter()
            .filter(|s| s.content_type == content_type)
            .map(|s| &s.row)
            .find(|row| {
                row.document_id.as_ref() == Some(document_id)
                    && row.state == state
                    && (locale.is_none() || row.locale.as_deref() == locale)
            })
            .cloned())
    }

    async fn find_current_row(
        &self,
        content_type: &str,
        selector: &Selector,
    ) -> StoreResult<Option<Row>> {
        self.enter(&self.calls.current_row).await?;
        let default_locale = self.default_locale();
        Ok(self
            .rows
            .read()
            .iter()
            .filter(|s| s.content_type == content_type)
            .map(|s| &s.row)
            .find(|row| matches_selector(row, selector, default_locale.as_deref()))
            .cloned())
    }

    async fn list_configured_locales(&self) -> StoreResult<Vec<String>> {
        self.enter(&self.calls.locales).await?;
        Ok(self.locales.read().clone())
    }
}
