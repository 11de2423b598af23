//! CLI command implementations.

pub mod classify;
pub mod generate;
pub mod resolve;
pub mod validate;

use advuuid_core::{Config, ContentTypeSchema, LookupErrorPolicy};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A schema file holds one schema or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaFile {
    Many(Vec<ContentTypeSchema>),
    One(ContentTypeSchema),
}

/// Builds the resolver configuration from command-line flags.
pub fn config(prefix: Option<String>, marker: Option<String>, escalate: bool) -> Config {
    let mut config = Config::new();
    if let Some(prefix) = prefix {
        config = config.content_type_prefix(prefix);
    }
    if let Some(marker) = marker {
        config = config.marker(marker);
    }
    if escalate {
        config = config.lookup_errors(LookupErrorPolicy::Escalate);
    }
    config
}

/// Reads and parses a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let value = serde_json::from_str(&text).map_err(|e| format!("{}: {e}", path.display()))?;
    Ok(value)
}

/// Loads every schema from `paths`.
pub fn load_schemas<P: AsRef<Path>>(
    paths: &[P],
) -> Result<Vec<ContentTypeSchema>, Box<dyn std::error::Error>> {
    let mut schemas = Vec::new();
    for path in paths {
        match read_json(path.as_ref())? {
            SchemaFile::Many(many) => schemas.extend(many),
            SchemaFile::One(one) => schemas.push(one),
        }
    }
    Ok(schemas)
}
