//! Content-type schema model as exposed by the host.
//!
//! Only the parts relevant to identifier management are modelled; unknown
//! keys in the host's JSON are ignored.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A content type and its attributes, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentTypeSchema {
    /// Content type identifier, e.g. `api::article.article`.
    pub uid: String,
    /// Attributes keyed by name.
    #[serde(default)]
    pub attributes: IndexMap<String, AttributeSchema>,
}

impl ContentTypeSchema {
    /// Creates a schema with no attributes.
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            attributes: IndexMap::new(),
        }
    }

    /// Appends an attribute.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, attribute: AttributeSchema) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }
}

/// One attribute of a content type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSchema {
    /// Host storage type (`string`, `uid`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Custom field marker, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_field: Option<String>,
    /// Custom field options.
    #[serde(default)]
    pub options: AttributeOptions,
    /// Options contributed by host plugins (i18n).
    #[serde(default)]
    pub plugin_options: PluginOptions,
}

impl AttributeSchema {
    /// A plain attribute of the given storage type.
    pub fn plain(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::default()
        }
    }

    /// An attribute carrying a custom field marker.
    pub fn custom(marker: impl Into<String>, options: AttributeOptions) -> Self {
        Self {
            kind: Some("string".to_string()),
            custom_field: Some(marker.into()),
            options,
            plugin_options: PluginOptions::default(),
        }
    }

    /// Marks the attribute as varying per locale.
    #[must_use]
    pub fn localized(mut self, localized: bool) -> Self {
        self.plugin_options.i18n = Some(I18nOptions { localized });
        self
    }

    /// Returns the i18n localization flag, defaulting to false.
    pub fn is_localized(&self) -> bool {
        self.plugin_options
            .i18n
            .as_ref()
            .is_some_and(|i18n| i18n.localized)
    }
}

/// Options map of a managed attribute.
///
/// Accepts both the camelCase keys and the hyphenated keys older hosts
/// store (`uuid-format`, `disable-auto-fill`, `disable-regenerate`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeOptions {
    /// Regex body constraining the identifier.
    #[serde(default, alias = "uuid-format", skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Never generate a value automatically.
    #[serde(default, alias = "disable-auto-fill")]
    pub auto_fill_disabled: bool,
    /// Never replace a stored value with a client-supplied one.
    #[serde(default, alias = "disable-regenerate")]
    pub regenerate_disabled: bool,
}

impl AttributeOptions {
    /// Options with a format body.
    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
            ..Self::default()
        }
    }

    /// Sets the auto-fill flag.
    #[must_use]
    pub fn auto_fill_disabled(mut self, value: bool) -> Self {
        self.auto_fill_disabled = value;
        self
    }

    /// Sets the regenerate flag.
    #[must_use]
    pub fn regenerate_disabled(mut self, value: bool) -> Self {
        self.regenerate_disabled = value;
        self
    }
}

/// Plugin-contributed attribute options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginOptions {
    /// i18n plugin options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i18n: Option<I18nOptions>,
}

/// i18n plugin options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct I18nOptions {
    /// Whether the attribute varies per locale.
    #[serde(default)]
    pub localized: bool,
}
