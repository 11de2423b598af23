//! Resolver scenarios against the in-memory store.

use advuuid_core::{
    Action, Check, Config, LookupErrorPolicy, ManagedAttributeConfig, OperationEvent,
    PublicationState, Resolution, ResolveError, Row, RowId, Selector, Source, StoreError,
    ValidationFailure, AGGREGATE_MESSAGE, FORMAT_INVALID_MESSAGE,
};
use advuuid_testkit::prelude::*;
use serde_json::{json, Value};

fn failure(result: Result<Resolution, ResolveError>) -> ValidationFailure {
    match result {
        Err(ResolveError::Validation(failure)) => failure,
        other => panic!("expected validation failure, got {other:?}"),
    }
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn create_generates_matching_value() {
    let h = Harness::new(&["en"]);
    let mut event = OperationEvent::create(ARTICLE, payload(json!({ "title": "Hello" })));

    let resolution = h.resolver.resolve(&mut event).await.unwrap();

    let value = event.identifier("uuidField").unwrap();
    assert_eq!(value.len(), 5);
    assert!(value.chars().all(|c| c.is_ascii_alphanumeric()));
    let outcome = resolution.get("uuidField").unwrap();
    assert_eq!(outcome.action, Action::Generated);
    assert_eq!(outcome.check, Check::Passed);
}

#[tokio::test]
async fn create_keeps_valid_client_value() {
    let h = Harness::new(&["en"]);
    let mut event = OperationEvent::create(PRODUCT, payload(json!({ "sku": "abcd-123" })));

    let resolution = h.resolver.resolve(&mut event).await.unwrap();

    assert_eq!(event.identifier("sku"), Some("abcd-123"));
    assert_eq!(resolution.get("sku").unwrap().action, Action::Kept);
}

#[tokio::test]
async fn create_rejects_invalid_client_value() {
    let h = Harness::new(&["en"]);
    let mut event = OperationEvent::create(PRODUCT, payload(json!({ "sku": "invalidsku" })));

    let failure = failure(h.resolver.resolve(&mut event).await);

    assert_eq!(failure.message, AGGREGATE_MESSAGE);
    assert_eq!(failure.violations.len(), 1);
    assert_eq!(failure.violations[0].path, "sku");
    assert_eq!(failure.violations[0].message, FORMAT_INVALID_MESSAGE);
}

#[tokio::test]
async fn shared_identifier_propagates_to_new_locale() {
    let h = Harness::new(&["en", "fr"]);
    h.store.insert(
        MULTI_LOCALE,
        Row::new(1)
            .document("D")
            .locale("en")
            .state(PublicationState::Published)
            .field("multiId", "WXYZ12"),
    );

    let mut event = OperationEvent::create(MULTI_LOCALE, payload(json!({ "title": "Bonjour" })))
        .with_document("D")
        .with_locale("fr");
    let resolution = h.resolver.resolve(&mut event).await.unwrap();

    assert_eq!(event.identifier("multiId"), Some("WXYZ12"));
    assert_eq!(
        resolution.get("multiId").unwrap().action,
        Action::Propagated {
            source: Source {
                locale: Some("en".into()),
                state: PublicationState::Published,
            }
        }
    );
}

#[tokio::test]
async fn draft_only_locale_is_the_propagation_source() {
    let h = Harness::new(&["en", "fr"]);
    h.store.insert(
        PAGE,
        Row::new(1).document("D").locale("en").field("code", "WXYZ"),
    );
    let attributes = [ManagedAttributeConfig::new("code").format("^[A-Z]{4}$")];

    let mut event = OperationEvent::create(PAGE, payload(json!({})))
        .with_document("D")
        .with_locale("fr");
    let resolution = h.resolver.resolve_with(&mut event, &attributes).await.unwrap();

    assert_eq!(event.identifier("code"), Some("WXYZ"));
    assert!(matches!(
        resolution.get("code").unwrap().action,
        Action::Propagated { .. }
    ));
}

#[tokio::test]
async fn propagation_overrides_client_value() {
    let h = Harness::new(&["en", "fr"]);
    h.store.insert(
        MULTI_LOCALE,
        Row::new(1).document("D").locale("en").field("multiId", "DRAFT1"),
    );

    let mut event = OperationEvent::create(MULTI_LOCALE, payload(json!({ "multiId": "OTHER9" })))
        .with_document("D")
        .with_locale("fr");
    h.resolver.resolve(&mut event).await.unwrap();

    assert_eq!(event.identifier("multiId"), Some("DRAFT1"));
}

#[tokio::test]
async fn propagation_sweeps_other_locales() {
    let h = Harness::new(&["en", "fr", "de"]);
    h.store.insert(
        MULTI_LOCALE,
        Row::new(1).document("D").locale("de").field("multiId", "DE0001"),
    );

    let mut event = OperationEvent::create(MULTI_LOCALE, payload(json!({})))
        .with_document("D")
        .with_locale("fr");
    let resolution = h.resolver.resolve(&mut event).await.unwrap();

    assert_eq!(event.identifier("multiId"), Some("DE0001"));
    assert_eq!(
        resolution.get("multiId").unwrap().action,
        Action::Propagated {
            source: Source {
                locale: Some("de".into()),
                state: PublicationState::Draft,
            }
        }
    );
}

#[tokio::test]
async fn localized_identifier_is_never_copied() {
    let h = Harness::new(&["en", "fr"]);
    h.store.insert(
        LOCALIZED,
        Row::new(1)
            .document("D")
            .locale("en")
            .state(PublicationState::Published)
            .field("contentId", "ABCD"),
    );

    let mut event = OperationEvent::create(LOCALIZED, payload(json!({})))
        .with_document("D")
        .with_locale("fr");
    let resolution = h.resolver.resolve(&mut event).await.unwrap();

    let value = event.identifier("contentId").unwrap();
    assert_eq!(value.len(), 4);
    assert!(value.chars().all(|c| c.is_ascii_uppercase()));
    assert_eq!(resolution.get("contentId").unwrap().action, Action::Generated);
    assert_eq!(h.store.calls().total(), 0);
}

#[tokio::test]
async fn auto_fill_disabled_skips_validation_when_nothing_supplied() {
    let h = Harness::new(&["en"]);
    let mut event = OperationEvent::create(ACCOUNT, payload(json!({})));

    let resolution = h.resolver.resolve(&mut event).await.unwrap();

    assert!(!event.attributes.contains_key("externalId"));
    let outcome = resolution.get("externalId").unwrap();
    assert_eq!(outcome.action, Action::Untouched);
    assert_eq!(outcome.check, Check::Skipped);
}

#[tokio::test]
async fn auto_fill_disabled_still_validates_supplied_values() {
    let h = Harness::new(&["en"]);
    let mut event = OperationEvent::create(ACCOUNT, payload(json!({ "externalId": "nope" })));
    let failure = failure(h.resolver.resolve(&mut event).await);
    assert_eq!(failure.paths().collect::<Vec<_>>(), vec!["externalId"]);

    let mut event = OperationEvent::create(
        ACCOUNT,
        payload(json!({ "externalId": "6F9619FF-8B86-4011-B42D-00C04FC964FF" })),
    );
    h.resolver.resolve(&mut event).await.unwrap();
}

#[tokio::test]
async fn unsatisfiable_format_surfaces_as_violation() {
    let h = Harness::new(&["en"]);
    let mut event = OperationEvent::create(BROKEN, payload(json!({})));

    let failure = failure(h.resolver.resolve(&mut event).await);

    assert_eq!(failure.paths().collect::<Vec<_>>(), vec!["code"]);
    assert_eq!(event.attributes["code"], Value::Null);
}

#[tokio::test]
async fn unmanaged_content_type_passes_through() {
    let h = Harness::new(&["en"]);
    let original = payload(json!({ "title": "About" }));
    let mut event = OperationEvent::create(PAGE, original.clone());

    let resolution = h.resolver.resolve(&mut event).await.unwrap();

    assert!(resolution.outcomes.is_empty());
    assert_eq!(event.attributes, original);
}

#[tokio::test]
async fn violations_are_reported_together_in_order() {
    let h = Harness::new(&["en"]);
    let attributes = [
        ManagedAttributeConfig::new("code").format("^[A-Z]{2}$"),
        ManagedAttributeConfig::new("uuid"),
        ManagedAttributeConfig::new("number").format("^[0-9]{3}$"),
    ];
    let mut event = OperationEvent::create(
        PAGE,
        payload(json!({ "code": "abc", "uuid": "not-a-uuid", "number": "123" })),
    );

    let failure = failure(h.resolver.resolve_with(&mut event, &attributes).await);

    assert_eq!(failure.paths().collect::<Vec<_>>(), vec!["code", "uuid"]);
    assert!(failure.to_string().starts_with(AGGREGATE_MESSAGE));
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn locked_identifier_ignores_replacement() {
    let h = Harness::new(&["en"]);
    h.store
        .insert(IMMUTABLE, Row::new(1).field("immutableId", "ABC123"));

    let mut event = OperationEvent::update(
        IMMUTABLE,
        Selector::by_id(1),
        payload(json!({ "immutableId": "NEW456" })),
    );
    let resolution = h.resolver.resolve(&mut event).await.unwrap();

    assert!(!event.attributes.contains_key("immutableId"));
    let outcome = resolution.get("immutableId").unwrap();
    assert_eq!(outcome.action, Action::Discarded);
    assert_eq!(outcome.check, Check::Skipped);

    let row = h.store.commit(&event).unwrap();
    assert_eq!(row.identifier("immutableId"), Some("ABC123"));
}

#[tokio::test]
async fn empty_value_does_not_clear_stored_identifier() {
    let h = Harness::new(&["en"]);
    h.store.insert(PRODUCT, Row::new(5).field("sku", "ABCD-123"));

    let mut event = OperationEvent::update(
        PRODUCT,
        Selector::by_id(5),
        payload(json!({ "sku": "" })),
    );
    let resolution = h.resolver.resolve(&mut event).await.unwrap();

    assert_eq!(event.identifier("sku"), Some("ABCD-123"));
    assert_eq!(resolution.get("sku").unwrap().action, Action::Preserved);
}

#[tokio::test]
async fn absent_value_is_left_alone_on_update() {
    let h = Harness::new(&["en"]);
    h.store.insert(PRODUCT, Row::new(5).field("sku", "ABCD-123"));

    let mut event = OperationEvent::update(
        PRODUCT,
        Selector::by_id(5),
        payload(json!({ "name": "Renamed" })),
    );
    let resolution = h.resolver.resolve(&mut event).await.unwrap();

    assert!(!event.attributes.contains_key("sku"));
    let outcome = resolution.get("sku").unwrap();
    assert_eq!(outcome.action, Action::Untouched);
    assert_eq!(outcome.check, Check::Skipped);
}

#[tokio::test]
async fn document_update_preserves_stored_value() {
    let h = Harness::new(&["en", "fr"]);
    h.store.insert(
        MULTI_LOCALE,
        Row::new(1).document("D").locale("fr").field("multiId", "AAA111"),
    );

    let mut event = OperationEvent::update(
        MULTI_LOCALE,
        Selector::by_document("D").locale("fr"),
        payload(json!({ "title": "Salut" })),
    );
    let resolution = h.resolver.resolve(&mut event).await.unwrap();

    assert_eq!(event.identifier("multiId"), Some("AAA111"));
    let outcome = resolution.get("multiId").unwrap();
    assert_eq!(outcome.action, Action::Preserved);
    assert_eq!(outcome.check, Check::Passed);
}

#[tokio::test]
async fn missing_identifier_heals_from_sibling() {
    let h = Harness::new(&["en", "fr"]);
    h.store.insert(
        MULTI_LOCALE,
        Row::new(1)
            .document("D")
            .locale("en")
            .state(PublicationState::Published)
            .field("multiId", "QWE123"),
    );
    h.store
        .insert(MULTI_LOCALE, Row::new(2).document("D").locale("fr"));

    let mut event = OperationEvent::update(
        MULTI_LOCALE,
        Selector::by_document("D").locale("fr"),
        payload(json!({ "title": "Salut" })),
    );
    let resolution = h.resolver.resolve(&mut event).await.unwrap();

    assert_eq!(event.identifier("multiId"), Some("QWE123"));
    assert_eq!(
        resolution.get("multiId").unwrap().action,
        Action::Backfilled {
            source: Source {
                locale: Some("en".into()),
                state: PublicationState::Published,
            }
        }
    );

    let row = h.store.commit(&event).unwrap();
    assert_eq!(row.id, Some(RowId::new(2)));
    assert_eq!(row.identifier("multiId"), Some("QWE123"));
}

#[tokio::test]
async fn heal_generates_when_no_sibling_has_a_value() {
    let h = Harness::new(&["en"]);
    h.store.insert(PRODUCT, Row::new(9).field("name", "Legacy"));

    let mut event = OperationEvent::update(
        PRODUCT,
        Selector::by_id(9),
        payload(json!({ "sku": null })),
    );
    let resolution = h.resolver.resolve(&mut event).await.unwrap();

    assert_eq!(event.identifier("sku").map(str::len), Some(8));
    assert_eq!(resolution.get("sku").unwrap().action, Action::Generated);
}

#[tokio::test]
async fn heal_prefers_same_locale_sibling_in_requested_state() {
    let h = Harness::new(&["en", "fr"]);
    h.store.insert(
        MULTI_LOCALE,
        Row::new(1)
            .document("D")
            .locale("fr")
            .state(PublicationState::Published)
            .field("multiId", "FRPUB1"),
    );
    h.store.insert(
        MULTI_LOCALE,
        Row::new(2)
            .document("D")
            .locale("fr")
            .state(PublicationState::Draft),
    );
    h.store.insert(
        MULTI_LOCALE,
        Row::new(3)
            .document("D")
            .locale("en")
            .state(PublicationState::Published)
            .field("multiId", "ENPUB1"),
    );

    let mut event = OperationEvent::update(
        MULTI_LOCALE,
        Selector::by_id(2),
        payload(json!({ "title": "Salut" })),
    )
    .with_published(true);
    let resolution = h.resolver.resolve(&mut event).await.unwrap();

    assert_eq!(event.identifier("multiId"), Some("FRPUB1"));
    assert_eq!(
        resolution.get("multiId").unwrap().action,
        Action::Backfilled {
            source: Source {
                locale: Some("fr".into()),
                state: PublicationState::Published,
            }
        }
    );
}

#[tokio::test]
async fn heal_falls_back_to_default_locale() {
    let h = Harness::new(&["en", "fr"]);
    h.store.insert(
        MULTI_LOCALE,
        Row::new(1)
            .document("D")
            .locale("en")
            .state(PublicationState::Published)
            .field("multiId", "ENPUB1"),
    );
    h.store.insert(
        MULTI_LOCALE,
        Row::new(2)
            .document("D")
            .locale("fr")
            .state(PublicationState::Draft),
    );

    let mut event = OperationEvent::update(
        MULTI_LOCALE,
        Selector::by_id(2),
        payload(json!({ "title": "Salut" })),
    )
    .with_published(true);
    let resolution = h.resolver.resolve(&mut event).await.unwrap();

    assert_eq!(event.identifier("multiId"), Some("ENPUB1"));
    assert_eq!(
        resolution.get("multiId").unwrap().action,
        Action::Backfilled {
            source: Source {
                locale: Some("en".into()),
                state: PublicationState::Published,
            }
        }
    );
}

#[tokio::test]
async fn localized_heal_sweeps_published_locales_only() {
    let h = Harness::new(&["en", "fr", "de"]);
    h.store.insert(
        LOCALIZED,
        Row::new(1)
            .document("D")
            .locale("de")
            .state(PublicationState::Published)
            .field("contentId", "DEPB"),
    );
    h.store.insert(
        LOCALIZED,
        Row::new(2)
            .document("D")
            .locale("fr")
            .state(PublicationState::Draft),
    );
    h.store.insert(
        LOCALIZED,
        Row::new(3)
            .document("D")
            .locale("en")
            .state(PublicationState::Draft)
            .field("contentId", "ENDR"),
    );

    let mut event = OperationEvent::update(
        LOCALIZED,
        Selector::by_id(2),
        payload(json!({ "title": "Salut" })),
    )
    .with_published(true);
    let resolution = h.resolver.resolve(&mut event).await.unwrap();

    assert_eq!(event.identifier("contentId"), Some("DEPB"));
    assert_eq!(
        resolution.get("contentId").unwrap().action,
        Action::Backfilled {
            source: Source {
                locale: Some("de".into()),
                state: PublicationState::Published,
            }
        }
    );
}

#[tokio::test]
async fn update_without_row_generates_for_explicit_empty() {
    let h = Harness::new(&["en"]);
    let mut event = OperationEvent::update(
        PRODUCT,
        Selector::default().locale("en"),
        payload(json!({ "sku": null })),
    );

    let resolution = h.resolver.resolve(&mut event).await.unwrap();

    assert_eq!(resolution.get("sku").unwrap().action, Action::Generated);
    assert_eq!(h.store.calls().total(), 0);
}

#[tokio::test]
async fn update_without_selector_is_rejected() {
    let h = Harness::new(&["en"]);
    let mut event = OperationEvent::update(PRODUCT, Selector::by_id(1), payload(json!({})));
    event.selector = None;

    let result = h.resolver.resolve(&mut event).await;
    assert!(matches!(result, Err(ResolveError::InvalidEvent { .. })));
}

// ============================================================================
// Lookup failures
// ============================================================================

#[tokio::test]
async fn failed_lookups_degrade_to_generation() {
    let h = Harness::new(&["en", "fr"]);
    h.store.fail_with(Some(StoreError::unavailable("connection reset")));

    let mut event = OperationEvent::create(MULTI_LOCALE, payload(json!({})))
        .with_document("D")
        .with_locale("fr");
    let resolution = h.resolver.resolve(&mut event).await.unwrap();

    assert_eq!(resolution.get("multiId").unwrap().action, Action::Generated);
    assert!(h.store.calls().sibling() >= 2);
}

#[tokio::test]
async fn unreadable_row_generates_for_explicit_empty() {
    let h = Harness::new(&["en"]);
    h.store
        .insert(PRODUCT, Row::new(5).locale("en").field("sku", "ABCD-123"));
    h.store.fail_with(Some(StoreError::unavailable("connection reset")));

    let mut event = OperationEvent::update(
        PRODUCT,
        Selector::by_id(5),
        payload(json!({ "sku": null })),
    );
    let resolution = h.resolver.resolve(&mut event).await.unwrap();

    assert_eq!(resolution.get("sku").unwrap().action, Action::Generated);
    assert_eq!(resolution.get("sku").unwrap().check, Check::Passed);
    let sku = event.identifier("sku").unwrap();
    assert_eq!(sku.len(), 8);
    assert_ne!(sku, "ABCD-123");
    assert_eq!(h.store.calls().current_row(), 1);
}

#[tokio::test]
async fn failed_lookups_escalate_when_configured() {
    let h = Harness::with_config(
        &["en", "fr"],
        Config::new().lookup_errors(LookupErrorPolicy::Escalate),
    );
    h.store.fail_with(Some(StoreError::Timeout));

    let mut event = OperationEvent::create(MULTI_LOCALE, payload(json!({})))
        .with_document("D")
        .with_locale("fr");
    let result = h.resolver.resolve(&mut event).await;

    match result {
        Err(ResolveError::Lookup {
            content_type,
            operation,
            source,
        }) => {
            assert_eq!(content_type, MULTI_LOCALE);
            assert_eq!(operation, "find_sibling");
            assert_eq!(source, StoreError::Timeout);
        }
        other => panic!("expected lookup error, got {other:?}"),
    }
    assert_eq!(h.store.calls().sibling(), 1);
}
