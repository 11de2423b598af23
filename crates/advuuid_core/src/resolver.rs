//! Identifier consistency resolver.
//!
//! For every intercepted create or update, each managed attribute is driven
//! through three phases:
//!
//! 1. **Create**: generate a placeholder when nothing was supplied, then
//!    (for attributes shared across locales) copy the value of an existing
//!    sibling of the same document, and finally generate if still empty.
//! 2. **Update**: keep the stored value when the payload omits it, drop
//!    client replacements of locked values, and backfill rows that never
//!    received a value.
//! 3. **Validate**: check the final value against the attribute's format,
//!    unless auto-fill is off and the client never supplied a value.
//!
//! All violations of one event are reported together as a single
//! [`ValidationFailure`](crate::ValidationFailure).

use crate::classify::ManagedAttributeConfig;
use crate::config::Config;
use crate::error::{ResolveError, ResolveResult};
use crate::locks::{DocumentGuard, DocumentLocks};
use crate::registry::ManagedRegistry;
use crate::store::{DocumentStore, Lookup};
use crate::strategy::{Found, Search, Source, Strategy};
use crate::types::PublicationState::{self, Draft, Published};
use crate::types::{self, DocumentId, OperationEvent, OperationKind, Row, Selector};
use crate::validation::{Violation, ViolationCollector};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// What resolution did to one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    /// The client-supplied value was left in place.
    Kept,
    /// A new value was generated.
    Generated,
    /// Generation was needed but the format could not produce a value.
    GenerationFailed,
    /// The value was copied from a sibling on create.
    Propagated {
        /// Sibling the value came from.
        source: Source,
    },
    /// The stored value of the updated row was carried into the payload.
    Preserved,
    /// An empty stored value was filled from a sibling on update.
    Backfilled {
        /// Sibling the value came from.
        source: Source,
    },
    /// A client replacement of a locked value was removed from the payload.
    Discarded,
    /// The attribute was not touched.
    Untouched,
}

/// Result of validating one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Check {
    /// Validation did not apply.
    Skipped,
    /// The final value matches the format.
    Passed,
    /// The final value is missing or does not match the format.
    Failed,
}

/// Resolution outcome of one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeOutcome {
    /// Attribute name.
    pub attribute: String,
    /// What was done to the payload.
    #[serde(flatten)]
    pub action: Action,
    /// Validation result.
    pub check: Check,
}

/// Outcomes of every managed attribute of a successfully resolved event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Per-attribute outcomes in schema order.
    pub outcomes: Vec<AttributeOutcome>,
}

impl Resolution {
    /// Returns the outcome for `attribute`.
    pub fn get(&self, attribute: &str) -> Option<&AttributeOutcome> {
        self.outcomes.iter().find(|o| o.attribute == attribute)
    }
}

/// Decides, per managed attribute, whether to generate, copy, reject or
/// discard identifier values on intercepted writes.
pub struct Resolver<S: DocumentStore + ?Sized> {
    registry: Arc<ManagedRegistry>,
    store: Arc<S>,
    config: Config,
    locks: DocumentLocks,
}

impl<S: DocumentStore + ?Sized> Resolver<S> {
    /// Creates a resolver over a registry and a store.
    pub fn new(registry: Arc<ManagedRegistry>, store: Arc<S>, config: Config) -> Self {
        Self {
            registry,
            store,
            config,
            locks: DocumentLocks::new(),
        }
    }

    /// Returns the registry.
    pub fn registry(&self) -> &ManagedRegistry {
        &self.registry
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the per-document lock table.
    pub fn locks(&self) -> &DocumentLocks {
        &self.locks
    }

    /// Resolves every managed attribute of `event` in place.
    ///
    /// Events for content types without managed attributes pass through
    /// untouched.
    pub async fn resolve(&self, event: &mut OperationEvent) -> ResolveResult<Resolution> {
        match self.registry.get(&event.content_type) {
            Some(attributes) => self.resolve_with(event, attributes).await,
            None => {
                debug!(content_type = %event.content_type, "no managed attributes");
                Ok(Resolution::default())
            }
        }
    }

    /// Like [`resolve`](Self::resolve), but first takes the assignment lock
    /// of the event's document.
    ///
    /// The returned guard must be held until the host's write commits.
    /// Returns `None` when the event carries no document ID or
    /// serialization is disabled.
    pub async fn resolve_serialized(
        &self,
        event: &mut OperationEvent,
    ) -> ResolveResult<(Resolution, Option<DocumentGuard>)> {
        let guard = match event.target_document() {
            Some(document_id) if self.config.serialize_per_document => {
                Some(self.locks.acquire(&event.content_type, document_id).await)
            }
            _ => None,
        };
        let resolution = self.resolve(event).await?;
        Ok((resolution, guard))
    }

    /// Resolves `event` against an explicit attribute list.
    pub async fn resolve_with(
        &self,
        event: &mut OperationEvent,
        attributes: &[ManagedAttributeConfig],
    ) -> ResolveResult<Resolution> {
        if event.kind == OperationKind::Update && event.selector.is_none() {
            return Err(ResolveError::invalid_event("update without a selector"));
        }

        let mut violations = ViolationCollector::new();
        let mut resolution = Resolution::default();

        for attr in attributes {
            let outcome = self.resolve_attribute(event, attr).await?;
            if outcome.check == Check::Failed {
                violations.push(Violation::format_invalid(&attr.name));
            }
            resolution.outcomes.push(outcome);
        }

        violations.finish()?;
        Ok(resolution)
    }

    /// Resolves one attribute of `event` in place.
    pub async fn resolve_attribute(
        &self,
        event: &mut OperationEvent,
        attr: &ManagedAttributeConfig,
    ) -> ResolveResult<AttributeOutcome> {
        let supplied = !types::is_empty(event.attributes.get(&attr.name));

        let action = match event.kind {
            OperationKind::Create => self.resolve_create(event, attr, supplied).await?,
            OperationKind::Update => self.resolve_update(event, attr, supplied).await?,
        };
        let check = check(event, attr, supplied);

        debug!(
            content_type = %event.content_type,
            attribute = %attr.name,
            ?action,
            ?check,
            "resolved identifier"
        );

        Ok(AttributeOutcome {
            attribute: attr.name.clone(),
            action,
            check,
        })
    }

    async fn resolve_create(
        &self,
        event: &mut OperationEvent,
        attr: &ManagedAttributeConfig,
        supplied: bool,
    ) -> ResolveResult<Action> {
        let mut action = if supplied {
            Action::Kept
        } else {
            Action::Untouched
        };

        if !supplied && !attr.auto_fill_disabled {
            action = generate_into(event, attr);
        }

        if !attr.localized {
            if let Some(document_id) = event.document_id.clone() {
                let exclude = event.locale.clone();
                let strategies = [
                    Strategy::sibling(None, Published),
                    Strategy::sibling(None, Draft),
                    Strategy::each_locale(exclude.as_deref(), &[Published, Draft]),
                ];
                if let Some(found) = self.search(event, attr, &document_id, &strategies).await? {
                    action = Action::Propagated {
                        source: found.source,
                    };
                    set(event, attr, found.value);
                }
            }
        }

        if types::is_empty(event.attributes.get(&attr.name)) && !attr.auto_fill_disabled {
            action = generate_into(event, attr);
        }

        Ok(action)
    }

    async fn resolve_update(
        &self,
        event: &mut OperationEvent,
        attr: &ManagedAttributeConfig,
        supplied: bool,
    ) -> ResolveResult<Action> {
        let selector = event.selector.clone().unwrap_or_default();

        if !supplied && selector.document_id.is_some() {
            return match self.current_row(event, &selector).await? {
                Some(row) => match row.identifier(&attr.name) {
                    Some(stored) => {
                        set(event, attr, stored.to_string());
                        Ok(Action::Preserved)
                    }
                    None => self.heal(event, attr, &selector, &row).await,
                },
                None => Ok(fill_explicit_empty(event, attr)),
            };
        }

        if supplied && attr.regenerate_disabled {
            event.attributes.remove(&attr.name);
            return Ok(Action::Discarded);
        }

        if !supplied && selector.id.is_some() {
            return match self.current_row(event, &selector).await? {
                Some(row) => match row.identifier(&attr.name) {
                    // An explicit empty value must not clear the stored one.
                    Some(stored) if event.attributes.contains_key(&attr.name) => {
                        set(event, attr, stored.to_string());
                        Ok(Action::Preserved)
                    }
                    Some(_) => Ok(Action::Untouched),
                    None => self.heal(event, attr, &selector, &row).await,
                },
                // A missing or unreadable row is treated like no selector.
                None => Ok(fill_explicit_empty(event, attr)),
            };
        }

        if supplied {
            Ok(Action::Kept)
        } else {
            Ok(fill_explicit_empty(event, attr))
        }
    }

    /// Fills an empty stored value from a sibling, generating as a last resort.
    async fn heal(
        &self,
        event: &mut OperationEvent,
        attr: &ManagedAttributeConfig,
        selector: &Selector,
        row: &Row,
    ) -> ResolveResult<Action> {
        let document_id = row
            .document_id
            .clone()
            .or_else(|| selector.document_id.clone());

        if let Some(document_id) = document_id {
            let locale = row.locale.clone().or_else(|| selector.locale.clone());
            let state = PublicationState::from_flag(event.published.or(selector.published));

            let mut strategies = vec![Strategy::sibling(locale.as_deref(), state)];
            if !attr.localized {
                strategies.push(Strategy::sibling(None, Published));
                strategies.push(Strategy::sibling(None, Draft));
            }
            strategies.push(Strategy::each_locale(locale.as_deref(), &[Published]));

            if let Some(found) = self.search(event, attr, &document_id, &strategies).await? {
                set(event, attr, found.value);
                return Ok(Action::Backfilled {
                    source: found.source,
                });
            }
        }

        if attr.auto_fill_disabled {
            Ok(Action::Untouched)
        } else {
            Ok(generate_into(event, attr))
        }
    }

    async fn search(
        &self,
        event: &OperationEvent,
        attr: &ManagedAttributeConfig,
        document_id: &DocumentId,
        strategies: &[Strategy],
    ) -> ResolveResult<Option<Found>> {
        Search {
            store: &*self.store,
            policy: self.config.lookup_errors,
            content_type: &event.content_type,
            document_id,
            attribute: &attr.name,
        }
        .first_value(strategies)
        .await
    }

    async fn current_row(
        &self,
        event: &OperationEvent,
        selector: &Selector,
    ) -> ResolveResult<Option<Row>> {
        let lookup: Lookup<_> = self
            .store
            .find_current_row(&event.content_type, selector)
            .await
            .into();
        lookup.apply(
            self.config.lookup_errors,
            &event.content_type,
            "find_current_row",
        )
    }
}

/// Decides whether and how the final value is validated.
///
/// Validation is skipped when auto-fill is off and the client supplied
/// nothing. On update, an attribute absent from the payload leaves the
/// stored value untouched and is not validated either.
fn check(event: &OperationEvent, attr: &ManagedAttributeConfig, supplied: bool) -> Check {
    if attr.auto_fill_disabled && !supplied {
        return Check::Skipped;
    }
    let value = event.attributes.get(&attr.name);
    if event.kind == OperationKind::Update && value.is_none() {
        return Check::Skipped;
    }
    if advuuid_format::validate(attr.format_body(), types::text(value)) {
        Check::Passed
    } else {
        Check::Failed
    }
}

/// Generates into a key the payload sets to an empty value; an absent key
/// stays absent.
fn fill_explicit_empty(event: &mut OperationEvent, attr: &ManagedAttributeConfig) -> Action {
    if event.attributes.contains_key(&attr.name) && !attr.auto_fill_disabled {
        generate_into(event, attr)
    } else {
        Action::Untouched
    }
}

fn set(event: &mut OperationEvent, attr: &ManagedAttributeConfig, value: String) {
    event
        .attributes
        .insert(attr.name.clone(), Value::String(value));
}

/// Generates a value into the payload; a failed generation leaves `null`
/// behind so validation reports it.
fn generate_into(event: &mut OperationEvent, attr: &ManagedAttributeConfig) -> Action {
    match advuuid_format::generate(attr.format_body()) {
        Some(value) => {
            set(event, attr, value);
            Action::Generated
        }
        None => {
            warn!(
                content_type = %event.content_type,
                attribute = %attr.name,
                format = attr.format_body().unwrap_or_default(),
                "identifier format cannot generate values"
            );
            event.attributes.insert(attr.name.clone(), Value::Null);
            Action::GenerationFailed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_store::StubStore;
    use serde_json::json;

    const CT: &str = "api::thing.thing";

    fn resolver(store: StubStore, attrs: Vec<ManagedAttributeConfig>) -> Resolver<StubStore> {
        let registry = ManagedRegistry::from_entries([(CT.to_string(), attrs)]);
        Resolver::new(Arc::new(registry), Arc::new(store), Config::default())
    }

    fn attrs(value: serde_json::Value) -> serde_json::Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn check_skips_unsupplied_when_auto_fill_disabled() {
        let attr = ManagedAttributeConfig::new("id").auto_fill_disabled(true);
        let event = OperationEvent::create(CT, attrs(json!({})));
        assert_eq!(check(&event, &attr, false), Check::Skipped);
    }

    #[test]
    fn check_fails_on_missing_value_at_create() {
        let attr = ManagedAttributeConfig::new("id");
        let event = OperationEvent::create(CT, attrs(json!({})));
        assert_eq!(check(&event, &attr, false), Check::Failed);
    }

    #[test]
    fn check_skips_absent_key_on_update() {
        let attr = ManagedAttributeConfig::new("id");
        let event = OperationEvent::update(CT, Selector::by_id(1), attrs(json!({})));
        assert_eq!(check(&event, &attr, false), Check::Skipped);

        let event = OperationEvent::update(CT, Selector::by_id(1), attrs(json!({ "id": null })));
        assert_eq!(check(&event, &attr, false), Check::Failed);
    }

    #[tokio::test]
    async fn create_with_auto_fill_generates_uuid() {
        let resolver = resolver(StubStore::default(), vec![ManagedAttributeConfig::new("id")]);
        let mut event = OperationEvent::create(CT, attrs(json!({})));

        let resolution = resolver.resolve(&mut event).await.unwrap();

        assert!(advuuid_format::validate(None, event.identifier("id")));
        assert_eq!(resolution.outcomes.len(), 1);
        assert_eq!(resolution.outcomes[0].action, Action::Generated);
    }

    #[tokio::test]
    async fn unsupplied_locked_identifier_is_not_discarded() {
        let store = StubStore::new(&["en"], vec![Row::new(1).field("id", "LOCK01")]);
        let attr = ManagedAttributeConfig::new("id")
            .format("^[A-Z0-9]{6}$")
            .regenerate_disabled(true);
        let resolver = resolver(store, vec![attr]);

        let mut event = OperationEvent::update(CT, Selector::by_id(1), attrs(json!({ "id": "" })));
        let resolution = resolver.resolve(&mut event).await.unwrap();

        assert_eq!(event.identifier("id"), Some("LOCK01"));
        assert_eq!(resolution.outcomes[0].action, Action::Preserved);
    }

    #[tokio::test]
    async fn supplied_value_on_update_is_kept_and_validated() {
        let store = StubStore::new(&["en"], vec![Row::new(1).field("id", "OLD001")]);
        let resolver = resolver(
            store,
            vec![ManagedAttributeConfig::new("id").format("^[A-Z0-9]{6}$")],
        );

        let mut event =
            OperationEvent::update(CT, Selector::by_id(1), attrs(json!({ "id": "NEW002" })));
        let resolution = resolver.resolve(&mut event).await.unwrap();
        assert_eq!(resolution.outcomes[0].action, Action::Kept);
        assert_eq!(resolution.outcomes[0].check, Check::Passed);

        let mut event =
            OperationEvent::update(CT, Selector::by_id(1), attrs(json!({ "id": "bad" })));
        let err = resolver.resolve(&mut event).await.unwrap_err();
        assert_eq!(err.as_validation().map(|f| f.violations.len()), Some(1));
    }

    #[tokio::test]
    async fn document_update_without_row_is_untouched() {
        let resolver = resolver(
            StubStore::new(&["en"], Vec::new()),
            vec![ManagedAttributeConfig::new("id")],
        );
        let mut event =
            OperationEvent::update(CT, Selector::by_document("missing"), attrs(json!({})));

        let resolution = resolver.resolve(&mut event).await.unwrap();

        assert_eq!(resolution.outcomes[0].action, Action::Untouched);
        assert!(event.attributes.is_empty());
    }

    #[tokio::test]
    async fn heal_with_auto_fill_disabled_leaves_gap() {
        let store = StubStore::new(&["en"], vec![Row::new(1).document("D").locale("en")]);
        let resolver = resolver(
            store,
            vec![ManagedAttributeConfig::new("id").auto_fill_disabled(true)],
        );
        let mut event = OperationEvent::update(CT, Selector::by_document("D"), attrs(json!({})));

        let resolution = resolver.resolve(&mut event).await.unwrap();

        assert_eq!(resolution.outcomes[0].action, Action::Untouched);
        assert_eq!(resolution.outcomes[0].check, Check::Skipped);
    }

    #[tokio::test]
    async fn serialization_can_be_disabled() {
        let registry = ManagedRegistry::from_entries([(
            CT.to_string(),
            vec![ManagedAttributeConfig::new("id")],
        )]);
        let resolver = Resolver::new(
            Arc::new(registry),
            Arc::new(StubStore::default()),
            Config::new().serialize_per_document(false),
        );
        let mut event = OperationEvent::create(CT, attrs(json!({}))).with_document("D");

        let (_, guard) = resolver.resolve_serialized(&mut event).await.unwrap();
        assert!(guard.is_none());
        assert_eq!(resolver.locks().active(), 0);
    }

    #[test]
    fn outcomes_serialize_with_action_tag() {
        let outcome = AttributeOutcome {
            attribute: "sku".into(),
            action: Action::Backfilled {
                source: Source {
                    locale: Some("en".into()),
                    state: Published,
                },
            },
            check: Check::Passed,
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "attribute": "sku",
                "action": "backfilled",
                "source": { "locale": "en", "state": "published" },
                "check": "passed"
            })
        );
    }
}
