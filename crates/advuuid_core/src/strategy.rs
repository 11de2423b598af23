//! Ordered lookup strategies for finding an existing identifier.
//!
//! Fallback chains are plain data: a list of [`Strategy`] values evaluated
//! in order until one yields a non-empty value.

use crate::config::LookupErrorPolicy;
use crate::error::ResolveResult;
use crate::store::{DocumentStore, Lookup};
use crate::types::{DocumentId, PublicationState};
use serde::Serialize;
use tracing::trace;

/// One place to look for an existing identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// A sibling in one locale (or the default locale) and state.
    Sibling {
        /// Locale to search; `None` is the store default.
        locale: Option<String>,
        /// Publication state to search.
        state: PublicationState,
    },
    /// Every configured locale except `exclude`, trying `states` in order
    /// within each locale.
    EachLocale {
        /// Locale to skip.
        exclude: Option<String>,
        /// States to try per locale.
        states: Vec<PublicationState>,
    },
}

impl Strategy {
    /// Sibling in a specific locale, or the default one.
    pub fn sibling(locale: Option<&str>, state: PublicationState) -> Self {
        Self::Sibling {
            locale: locale.map(str::to_string),
            state,
        }
    }

    /// Sweep over the other configured locales.
    pub fn each_locale(exclude: Option<&str>, states: &[PublicationState]) -> Self {
        Self::EachLocale {
            exclude: exclude.map(str::to_string),
            states: states.to_vec(),
        }
    }
}

/// Where a copied identifier came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    /// Locale of the sibling, `None` for the default locale.
    pub locale: Option<String>,
    /// Publication state of the sibling.
    pub state: PublicationState,
}

/// A non-empty identifier found on a sibling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found {
    /// The identifier.
    pub value: String,
    /// Sibling that held it.
    pub source: Source,
}

/// Evaluates lookup strategies for one attribute of one document.
pub(crate) struct Search<'a, S: DocumentStore + ?Sized> {
    pub store: &'a S,
    pub policy: LookupErrorPolicy,
    pub content_type: &'a str,
    pub document_id: &'a DocumentId,
    pub attribute: &'a str,
}

impl<S: DocumentStore + ?Sized> Search<'_, S> {
    /// Returns the first non-empty value produced by `strategies`.
    pub async fn first_value(&self, strategies: &[Strategy]) -> ResolveResult<Option<Found>> {
        for strategy in strategies {
            let found = match strategy {
                Strategy::Sibling { locale, state } => {
                    self.sibling(locale.as_deref(), *state).await?
                }
                Strategy::EachLocale { exclude, states } => {
                    self.each_locale(exclude.as_deref(), states).await?
                }
            };
            if found.is_some() {
                return Ok(found);
            }
        }
        Ok(None)
    }

    async fn sibling(
        &self,
        locale: Option<&str>,
        state: PublicationState,
    ) -> ResolveResult<Option<Found>> {
        let lookup: Lookup<_> = self
            .store
            .find_sibling(self.content_type, self.document_id, locale, state)
            .await
            .into();
        let failed = lookup.is_failed();
        let row = lookup.apply(self.policy, self.content_type, "find_sibling")?;

        trace!(
            document_id = %self.document_id,
            locale = locale.unwrap_or("<default>"),
            %state,
            hit = row.is_some(),
            failed,
            "sibling lookup"
        );

        Ok(row.and_then(|row| {
            row.identifier(self.attribute).map(|value| Found {
                value: value.to_string(),
                source: Source {
                    locale: locale.map(str::to_string).or(row.locale.clone()),
                    state,
                },
            })
        }))
    }

    async fn each_locale(
        &self,
        exclude: Option<&str>,
        states: &[PublicationState],
    ) -> ResolveResult<Option<Found>> {
        let lookup: Lookup<_> = self.store.list_configured_locales().await.map(Some).into();
        let failed = lookup.is_failed();
        let locales = lookup
            .apply(self.policy, self.content_type, "list_configured_locales")?
            .unwrap_or_default();
        trace!(locales = locales.len(), failed, "locale sweep");

        for locale in locales.iter().filter(|l| Some(l.as_str()) != exclude) {
            for state in states {
                if let Some(found) = self.sibling(Some(locale), *state).await? {
                    return Ok(Some(found));
                }
            }
        }
        Ok(None)
    }
}
