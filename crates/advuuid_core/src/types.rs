//! Core type definitions: rows, selectors and operation events.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Physical row identifier assigned by the host store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub u64);

impl RowId {
    /// Creates a new row ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row:{}", self.0)
    }
}

/// Identifier shared by every locale and publication variant of one
/// logical document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates a document ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Draft or published variant of a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationState {
    /// Working copy.
    #[default]
    Draft,
    /// Publicly visible copy.
    Published,
}

impl PublicationState {
    /// Maps a host "published" flag onto a state; absent or false is draft.
    #[must_use]
    pub fn from_flag(published: Option<bool>) -> Self {
        if published.unwrap_or(false) {
            Self::Published
        } else {
            Self::Draft
        }
    }
}

impl fmt::Display for PublicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => f.write_str("draft"),
            Self::Published => f.write_str("published"),
        }
    }
}

/// A physical row as returned by the host store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// Physical row ID.
    #[serde(default)]
    pub id: Option<RowId>,
    /// Logical document this row belongs to.
    #[serde(default)]
    pub document_id: Option<DocumentId>,
    /// Locale code, if the content type is localized.
    #[serde(default)]
    pub locale: Option<String>,
    /// Publication state.
    #[serde(default)]
    pub state: PublicationState,
    /// Stored attribute values.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Row {
    /// Creates an empty draft row.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            id: Some(RowId::new(id)),
            ..Self::default()
        }
    }

    /// Sets the document ID.
    #[must_use]
    pub fn document(mut self, document_id: impl Into<DocumentId>) -> Self {
        self.document_id = Some(document_id.into());
        self
    }

    /// Sets the locale.
    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Sets the publication state.
    #[must_use]
    pub fn state(mut self, state: PublicationState) -> Self {
        self.state = state;
        self
    }

    /// Sets a stored field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Returns the stored identifier for `attribute`, if non-empty.
    pub fn identifier(&self, attribute: &str) -> Option<&str> {
        text(self.fields.get(attribute))
    }
}

/// Filter identifying the row targeted by an update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    /// Physical row ID.
    #[serde(default)]
    pub id: Option<RowId>,
    /// Shared logical document ID.
    #[serde(default)]
    pub document_id: Option<DocumentId>,
    /// Locale of the targeted row.
    #[serde(default)]
    pub locale: Option<String>,
    /// Publication flag of the targeted row.
    #[serde(default)]
    pub published: Option<bool>,
}

impl Selector {
    /// Selects a row by physical ID.
    #[must_use]
    pub fn by_id(id: u64) -> Self {
        Self {
            id: Some(RowId::new(id)),
            ..Self::default()
        }
    }

    /// Selects a row by document ID.
    pub fn by_document(document_id: impl Into<DocumentId>) -> Self {
        Self {
            document_id: Some(document_id.into()),
            ..Self::default()
        }
    }

    /// Narrows the selector to a locale.
    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Narrows the selector to a publication flag.
    #[must_use]
    pub fn published(mut self, published: bool) -> Self {
        self.published = Some(published);
        self
    }
}

/// Kind of write being intercepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// A new row is being inserted.
    Create,
    /// An existing row is being modified.
    Update,
}

/// One create or update on its way to the store.
///
/// `attributes` is the write payload and is mutated in place during
/// resolution. The `document_id`, `locale` and `published` hints describe
/// the row being created (a new locale or publication variant of an
/// existing document when `document_id` is set).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationEvent {
    /// Create or update.
    pub kind: OperationKind,
    /// Content type the row belongs to.
    pub content_type: String,
    /// Proposed attribute values.
    #[serde(default)]
    pub attributes: Map<String, Value>,
    /// Target row filter (updates only).
    #[serde(default)]
    pub selector: Option<Selector>,
    /// Document ID carried by the payload.
    #[serde(default)]
    pub document_id: Option<DocumentId>,
    /// Locale carried by the payload.
    #[serde(default)]
    pub locale: Option<String>,
    /// Publication flag carried by the payload.
    #[serde(default)]
    pub published: Option<bool>,
}

impl OperationEvent {
    /// Creates a create event.
    pub fn create(content_type: impl Into<String>, attributes: Map<String, Value>) -> Self {
        Self {
            kind: OperationKind::Create,
            content_type: content_type.into(),
            attributes,
            selector: None,
            document_id: None,
            locale: None,
            published: None,
        }
    }

    /// Creates an update event.
    pub fn update(
        content_type: impl Into<String>,
        selector: Selector,
        attributes: Map<String, Value>,
    ) -> Self {
        Self {
            kind: OperationKind::Update,
            content_type: content_type.into(),
            attributes,
            selector: Some(selector),
            document_id: None,
            locale: None,
            published: None,
        }
    }

    /// Sets the payload document ID.
    #[must_use]
    pub fn with_document(mut self, document_id: impl Into<DocumentId>) -> Self {
        self.document_id = Some(document_id.into());
        self
    }

    /// Sets the payload locale.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Sets the payload publication flag.
    #[must_use]
    pub fn with_published(mut self, published: bool) -> Self {
        self.published = Some(published);
        self
    }

    /// Returns the logical document this event writes to, if known.
    pub fn target_document(&self) -> Option<&DocumentId> {
        match self.kind {
            OperationKind::Create => self.document_id.as_ref(),
            OperationKind::Update => self
                .selector
                .as_ref()
                .and_then(|s| s.document_id.as_ref())
                .or(self.document_id.as_ref()),
        }
    }

    /// Returns the payload identifier for `attribute`, if non-empty text.
    pub fn identifier(&self, attribute: &str) -> Option<&str> {
        text(self.attributes.get(attribute))
    }
}

/// Returns true for absent, `null` and empty-string values.
pub fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Returns the value as identifier text, if it is a non-empty string.
pub fn text(value: Option<&Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}
