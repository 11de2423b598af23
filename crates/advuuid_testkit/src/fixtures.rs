//! Schema fixtures and resolver harness.
//!
//! The content types mirror the shapes hosts typically declare: a default
//! UUID field, custom formats, a locked identifier, and localized vs shared
//! identifiers on i18n-enabled types.

use crate::store::MemoryStore;
use advuuid_core::{
    AttributeOptions, AttributeSchema, Config, ContentTypeSchema, ManagedRegistry, Resolver,
    DEFAULT_MARKER,
};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Article: one managed field with a 5-character format.
pub const ARTICLE: &str = "api::article.article";
/// Product: SKU with an 8-character format.
pub const PRODUCT: &str = "api::product.product";
/// Immutable: locked identifier.
pub const IMMUTABLE: &str = "api::immutable.immutable";
/// Localized content: identifier varies per locale.
pub const LOCALIZED: &str = "api::localized-content.localized-content";
/// Multi-locale: identifier shared by all locales.
pub const MULTI_LOCALE: &str = "api::multi-locale.multi-locale";
/// Page: no managed attributes.
pub const PAGE: &str = "api::page.page";
/// Account: default v4 UUID format with auto-fill disabled.
pub const ACCOUNT: &str = "api::account.account";
/// Broken: a format no value can satisfy.
pub const BROKEN: &str = "api::broken.broken";

fn managed(format: &str) -> AttributeSchema {
    AttributeSchema::custom(DEFAULT_MARKER, AttributeOptions::with_format(format))
}

/// Article schema (`uuidField`, `^[A-Za-z0-9]{5}$`).
pub fn article_schema() -> ContentTypeSchema {
    ContentTypeSchema::new(ARTICLE)
        .attribute("title", AttributeSchema::plain("string"))
        .attribute("uuidField", managed("^[A-Za-z0-9]{5}$"))
}

/// Product schema (`sku`, `^[0-9a-zA-Z-]{8}$`).
pub fn product_schema() -> ContentTypeSchema {
    ContentTypeSchema::new(PRODUCT)
        .attribute("name", AttributeSchema::plain("string"))
        .attribute("sku", managed("^[0-9a-zA-Z-]{8}$"))
}

/// Immutable schema (`immutableId`, `^[A-Z0-9]{6}$`, regenerate disabled).
pub fn immutable_schema() -> ContentTypeSchema {
    ContentTypeSchema::new(IMMUTABLE).attribute(
        "immutableId",
        AttributeSchema::custom(
            DEFAULT_MARKER,
            AttributeOptions::with_format("^[A-Z0-9]{6}$").regenerate_disabled(true),
        ),
    )
}

/// Localized content schema (`contentId`, `^[A-Z]{4}$`, per locale).
pub fn localized_schema() -> ContentTypeSchema {
    ContentTypeSchema::new(LOCALIZED)
        .attribute("title", AttributeSchema::plain("string").localized(true))
        .attribute("contentId", managed("^[A-Z]{4}$").localized(true))
}

/// Multi-locale schema (`multiId`, `^[A-Z0-9]{6}$`, shared across locales).
pub fn multi_locale_schema() -> ContentTypeSchema {
    ContentTypeSchema::new(MULTI_LOCALE)
        .attribute("title", AttributeSchema::plain("string").localized(true))
        .attribute("multiId", managed("^[A-Z0-9]{6}$").localized(false))
}

/// Page schema (no managed attributes).
pub fn page_schema() -> ContentTypeSchema {
    ContentTypeSchema::new(PAGE).attribute("title", AttributeSchema::plain("string"))
}

/// Account schema (`externalId`, UUID format, auto-fill disabled).
pub fn account_schema() -> ContentTypeSchema {
    ContentTypeSchema::new(ACCOUNT).attribute(
        "externalId",
        AttributeSchema::custom(
            DEFAULT_MARKER,
            AttributeOptions::default().auto_fill_disabled(true),
        ),
    )
}

/// Broken schema (`code`, an empty character class).
pub fn broken_schema() -> ContentTypeSchema {
    ContentTypeSchema::new(BROKEN).attribute("code", managed("[a&&b]"))
}

/// Every fixture schema.
pub fn all_schemas() -> Vec<ContentTypeSchema> {
    vec![
        article_schema(),
        product_schema(),
        immutable_schema(),
        localized_schema(),
        multi_locale_schema(),
        page_schema(),
        account_schema(),
        broken_schema(),
    ]
}

/// Registry built from [`all_schemas`] with the default config.
pub fn registry() -> ManagedRegistry {
    ManagedRegistry::build(&all_schemas(), &Config::default())
}

/// Converts a JSON object literal into a payload map.
///
/// # Panics
///
/// Panics if `value` is not an object.
pub fn payload(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("payload must be a JSON object, got {other}"),
    }
}

/// A resolver wired to a fresh [`MemoryStore`] and the fixture registry.
pub struct Harness {
    /// The store, shared with the resolver.
    pub store: Arc<MemoryStore>,
    /// The resolver.
    pub resolver: Resolver<MemoryStore>,
}

impl Harness {
    /// Creates a harness with the default config and `locales`.
    pub fn new(locales: &[&str]) -> Self {
        Self::with_config(locales, Config::default())
    }

    /// Creates a harness with a custom config.
    pub fn with_config(locales: &[&str], config: Config) -> Self {
        let store = Arc::new(MemoryStore::with_locales(locales));
        let registry = Arc::new(ManagedRegistry::build(&all_schemas(), &config));
        let resolver = Resolver::new(registry, Arc::clone(&store), config);
        Self { store, resolver }
    }
}
