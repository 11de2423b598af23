//! Field classification: which attributes are identifier-managed.

use crate::config::Config;
use crate::schema::{AttributeSchema, ContentTypeSchema};
use serde::{Deserialize, Serialize};

/// Identifier settings of one managed attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedAttributeConfig {
    /// Attribute name.
    pub name: String,
    /// Regex body; `None` means v4 UUID syntax.
    #[serde(default)]
    pub format: Option<String>,
    /// Never generate a value automatically.
    #[serde(default)]
    pub auto_fill_disabled: bool,
    /// Drop client attempts to replace the value on update.
    #[serde(default)]
    pub regenerate_disabled: bool,
    /// Whether the attribute varies per locale.
    #[serde(default)]
    pub localized: bool,
}

impl ManagedAttributeConfig {
    /// Creates a config with defaults (UUID format, auto-fill on, not localized).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: None,
            auto_fill_disabled: false,
            regenerate_disabled: false,
            localized: false,
        }
    }

    /// Sets the regex body.
    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
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

    /// Sets the localization flag.
    #[must_use]
    pub fn localized(mut self, value: bool) -> Self {
        self.localized = value;
        self
    }

    /// Returns the format body, if one is configured.
    pub fn format_body(&self) -> Option<&str> {
        self.format.as_deref()
    }

    fn from_attribute(name: &str, attribute: &AttributeSchema) -> Self {
        Self {
            name: name.to_string(),
            format: attribute
                .options
                .format
                .clone()
                .filter(|f| !f.is_empty()),
            auto_fill_disabled: attribute.options.auto_fill_disabled,
            regenerate_disabled: attribute.options.regenerate_disabled,
            localized: attribute.is_localized(),
        }
    }
}

/// Lists the managed attributes of `schema` in declaration order.
pub fn classify(schema: &ContentTypeSchema, config: &Config) -> Vec<ManagedAttributeConfig> {
    schema
        .attributes
        .iter()
        .filter(|(_, attr)| attr.custom_field.as_deref() == Some(config.marker.as_str()))
        .map(|(name, attr)| ManagedAttributeConfig::from_attribute(name, attr))
        .collect()
}
