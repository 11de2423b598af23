//! Benchmark utilities.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use advuuid_core::{OperationEvent, PublicationState, Row};
use advuuid_testkit::{payload, MemoryStore, MULTI_LOCALE};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::json;

/// Formats exercised by the benchmarks, from trivial to alternation-heavy.
pub const FORMATS: &[(&str, &str)] = &[
    ("class", "^[A-Z0-9]{6}$"),
    ("sku", "^[0-9a-zA-Z-]{8}$"),
    ("prefixed", "^(INV|ORD|REF)-[0-9]{6}$"),
    ("uuid_like", "^[a-f0-9]{8}(-[a-f0-9]{4}){3}-[a-f0-9]{12}$"),
    ("unicode_word", "^\\w{4,12}$"),
];

/// Generates random alphanumeric strings of `len` characters.
pub fn random_values(count: usize, len: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| (&mut rng).sample_iter(&Alphanumeric).take(len).map(char::from).collect())
        .collect()
}

/// A store holding `documents` multi-locale documents, each published in the
/// first locale and drafted in the rest.
pub fn populated_store(documents: usize, locales: &[&str]) -> MemoryStore {
    let store = MemoryStore::with_locales(locales);
    for doc in 0..documents {
        for (i, locale) in locales.iter().enumerate() {
            let state = if i == 0 {
                PublicationState::Published
            } else {
                PublicationState::Draft
            };
            let mut row = Row::default()
                .document(format!("doc-{doc}"))
                .locale(*locale)
                .state(state);
            if i == 0 {
                row = row.field("multiId", format!("{doc:06}"));
            }
            store.insert(MULTI_LOCALE, row);
        }
    }
    store
}

/// A create of a new locale variant of `doc-{doc}`.
pub fn locale_create(doc: usize, locale: &str) -> OperationEvent {
    OperationEvent::create(MULTI_LOCALE, payload(json!({ "title": "bench" })))
        .with_document(format!("doc-{doc}"))
        .with_locale(locale)
}
