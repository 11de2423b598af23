//! Classify command implementation.

use super::load_schemas;
use advuuid_core::{Config, ManagedAttributeConfig, ManagedRegistry};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Runs the classify command.
pub fn run(
    paths: &[PathBuf],
    config: &Config,
    output: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let schemas = load_schemas(paths)?;
    let registry = ManagedRegistry::build(&schemas, config);

    match output {
        "json" => {
            let map: BTreeMap<&str, &[ManagedAttributeConfig]> = registry.iter().collect();
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        "text" => print!("{}", render(&registry)),
        other => return Err(format!("Unknown output format: {other}").into()),
    }
    Ok(())
}

fn render(registry: &ManagedRegistry) -> String {
    if registry.is_empty() {
        return "No managed content types\n".to_string();
    }
    let mut out = String::new();
    for (uid, attributes) in registry.iter() {
        out.push_str(uid);
        out.push('\n');
        for attr in attributes {
            out.push_str(&format!(
                "  {:<20} format={} auto-fill={} regenerate={} localized={}\n",
                attr.name,
                attr.format_body().unwrap_or("<uuid-v4>"),
                on_off(!attr.auto_fill_disabled),
                on_off(!attr.regenerate_disabled),
                if attr.localized { "yes" } else { "no" },
            ));
        }
    }
    out
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
