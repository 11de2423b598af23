//! Registry of managed content types.
//!
//! Built once at service start from every known schema and handed to the
//! resolver; it never changes afterwards.

use crate::classify::{classify, ManagedAttributeConfig};
use crate::config::Config;
use crate::schema::ContentTypeSchema;
use std::collections::BTreeMap;
use tracing::info;

/// Immutable map from content type uid to its managed attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagedRegistry {
    types: BTreeMap<String, Vec<ManagedAttributeConfig>>,
}

impl ManagedRegistry {
    /// Classifies every schema and keeps the ones with managed attributes.
    pub fn build<'a>(
        schemas: impl IntoIterator<Item = &'a ContentTypeSchema>,
        config: &Config,
    ) -> Self {
        let types: BTreeMap<_, _> = schemas
            .into_iter()
            .filter(|schema| config.manages_content_type(&schema.uid))
            .filter_map(|schema| {
                let managed = classify(schema, config);
                (!managed.is_empty()).then(|| (schema.uid.clone(), managed))
            })
            .collect();

        info!(
            content_types = types.len(),
            attributes = types.values().map(Vec::len).sum::<usize>(),
            "built managed identifier registry"
        );

        Self { types }
    }

    /// Builds a registry from already classified entries.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, Vec<ManagedAttributeConfig>)>,
    ) -> Self {
        Self {
            types: entries
                .into_iter()
                .filter(|(_, attrs)| !attrs.is_empty())
                .collect(),
        }
    }

    /// Returns the managed attributes of `uid`.
    pub fn get(&self, uid: &str) -> Option<&[ManagedAttributeConfig]> {
        self.types.get(uid).map(Vec::as_slice)
    }

    /// Returns true if `uid` has managed attributes.
    pub fn contains(&self, uid: &str) -> bool {
        self.types.contains_key(uid)
    }

    /// Content types the host should intercept writes for, sorted.
    pub fn content_types(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Iterates over all entries, sorted by uid.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ManagedAttributeConfig])> {
        self.types
            .iter()
            .map(|(uid, attrs)| (uid.as_str(), attrs.as_slice()))
    }

    /// Number of managed content types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no content type is managed.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
