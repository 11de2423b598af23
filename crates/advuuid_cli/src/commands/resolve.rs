//! Resolve command implementation.
//!
//! Loads a store snapshot into the in-memory store, runs the resolver on one
//! event and prints the outcome as JSON. Validation failures are printed in
//! the same shape a host would return them.

use super::{load_schemas, read_json};
use advuuid_core::{
    Config, ContentTypeSchema, ManagedRegistry, OperationEvent, ResolveError, Resolution,
    Resolver, Row,
};
use advuuid_testkit::{MemoryStore, Snapshot};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;

/// Dry-run output.
#[derive(Debug, Serialize)]
pub struct ResolveReport {
    /// Payload after resolution.
    pub attributes: Map<String, Value>,
    /// Per-attribute outcomes.
    pub outcomes: Resolution,
    /// Row written by `--commit`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committed: Option<Row>,
}

/// Runs the resolve command.
pub fn run(
    schemas: &Path,
    rows: Option<&Path>,
    event: &Path,
    config: Config,
    commit: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let schemas = load_schemas(&[schemas])?;
    let snapshot: Snapshot = match rows {
        Some(path) => read_json(path)?,
        None => Snapshot::default(),
    };
    let event: OperationEvent = read_json(event)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let report = runtime.block_on(dry_run(&schemas, snapshot, event, config, commit));

    match report {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(ResolveError::Validation(failure)) => {
            println!("{}", serde_json::to_string_pretty(&failure)?);
            Err(failure.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Resolves `event` against `snapshot`.
pub async fn dry_run(
    schemas: &[ContentTypeSchema],
    snapshot: Snapshot,
    mut event: OperationEvent,
    config: Config,
    commit: bool,
) -> Result<ResolveReport, ResolveError> {
    let registry = Arc::new(ManagedRegistry::build(schemas, &config));
    let store = Arc::new(MemoryStore::from_snapshot(snapshot));
    let resolver = Resolver::new(registry, Arc::clone(&store), config);

    let (outcomes, guard) = resolver.resolve_serialized(&mut event).await?;
    let committed = if commit { store.commit(&event) } else { None };
    drop(guard);

    tracing::info!(
        content_type = %event.content_type,
        attributes = outcomes.outcomes.len(),
        committed = committed.is_some(),
        "resolved event"
    );

    Ok(ResolveReport {
        attributes: event.attributes,
        outcomes,
        committed,
    })
}
