//! Per-document assignment locks.
//!
//! Two concurrent creates of different locales of the same document would
//! otherwise both miss each other and generate different identifiers. Holding
//! a [`DocumentGuard`] from resolution until the host's write commits makes
//! the second create observe the first one's row.

use crate::types::DocumentId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockKey = (String, DocumentId);
type LockTable = Mutex<HashMap<LockKey, Arc<AsyncMutex<()>>>>;

/// Table of per-document locks keyed by content type and document ID.
#[derive(Default)]
pub struct DocumentLocks {
    table: Arc<LockTable>,
}

impl DocumentLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive assignment rights on one document.
    pub async fn acquire(&self, content_type: &str, document_id: &DocumentId) -> DocumentGuard {
        let key = (content_type.to_string(), document_id.clone());
        let slot = {
            let mut table = self.table.lock();
            Arc::clone(
                table
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            )
        };

        let mut pending = PendingAcquire {
            key: &key,
            table: &self.table,
            armed: true,
        };
        let guard = slot.lock_owned().await;
        pending.armed = false;
        drop(pending);

        DocumentGuard {
            key,
            table: Arc::clone(&self.table),
            guard: Some(guard),
        }
    }

    /// Number of documents with a live or awaited lock.
    pub fn active(&self) -> usize {
        self.table.lock().len()
    }
}

impl fmt::Debug for DocumentLocks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentLocks")
            .field("active", &self.active())
            .finish()
    }
}

/// Prunes the table entry when an acquire is cancelled while waiting.
///
/// Declared before the lock future, so it drops after the future has
/// released its reference to the slot.
struct PendingAcquire<'a> {
    key: &'a LockKey,
    table: &'a LockTable,
    armed: bool,
}

impl Drop for PendingAcquire<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut table = self.table.lock();
        // Only the table still references the slot: nobody holds or waits.
        if table
            .get(self.key)
            .is_some_and(|slot| Arc::strong_count(slot) == 1)
        {
            table.remove(self.key);
        }
    }
}

/// Exclusive assignment rights on one document, released on drop.
pub struct DocumentGuard {
    key: LockKey,
    table: Arc<LockTable>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl DocumentGuard {
    /// Content type the guard covers.
    pub fn content_type(&self) -> &str {
        &self.key.0
    }

    /// Document the guard covers.
    pub fn document_id(&self) -> &DocumentId {
        &self.key.1
    }
}

impl fmt::Debug for DocumentGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentGuard")
            .field("content_type", &self.key.0)
            .field("document_id", &self.key.1)
            .finish()
    }
}

impl Drop for DocumentGuard {
    fn drop(&mut self) {
        let mut table = self.table.lock();
        // One reference in the table, one held by our guard: nobody waits.
        if let Some(slot) = table.get(&self.key) {
            if Arc::strong_count(slot) <= 2 {
                table.remove(&self.key);
            }
        }
        drop(self.guard.take());
    }
}
