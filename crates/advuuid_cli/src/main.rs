//! advuuid CLI
//!
//! Command-line tools for format-constrained identifiers.
//!
//! # Commands
//!
//! - `generate` - Generate values matching a format
//! - `validate` - Check a value against a format
//! - `classify` - List the managed attributes of content-type schemas
//! - `resolve` - Dry-run one write event against a snapshot of stored rows

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Format-constrained identifier tools.
#[derive(Parser)]
#[command(name = "advuuid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate values matching a format (v4 UUIDs by default)
    Generate {
        /// Regex body the values must match
        #[arg(short, long)]
        format: Option<String>,

        /// Number of values to generate
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },

    /// Check a value against a format (v4 UUID syntax by default)
    Validate {
        /// Regex body to check against
        #[arg(short, long)]
        format: Option<String>,

        /// Value to check
        value: String,
    },

    /// List the managed attributes of content-type schemas
    Classify {
        /// Schema files (one schema object or an array per file)
        #[arg(required = true)]
        schemas: Vec<PathBuf>,

        /// Only manage content types with this uid prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Attribute marker selecting managed attributes
        #[arg(long)]
        marker: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// Dry-run one write event against a snapshot of stored rows
    Resolve {
        /// Schema file (one schema object or an array)
        #[arg(short, long)]
        schemas: PathBuf,

        /// Store snapshot (locales and rows)
        #[arg(short, long)]
        rows: Option<PathBuf>,

        /// Event file
        #[arg(short, long)]
        event: PathBuf,

        /// Fail the event when a lookup fails instead of continuing
        #[arg(long)]
        escalate: bool,

        /// Apply the resolved event to the snapshot and print the written row
        #[arg(short, long)]
        commit: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate { format, count } => {
            commands::generate::run(format.as_deref(), count)?;
        }
        Commands::Validate { format, value } => {
            commands::validate::run(format.as_deref(), &value)?;
        }
        Commands::Classify {
            schemas,
            prefix,
            marker,
            output,
        } => {
            let config = commands::config(prefix, marker, false);
            commands::classify::run(&schemas, &config, &output)?;
        }
        Commands::Resolve {
            schemas,
            rows,
            event,
            escalate,
            commit,
        } => {
            let config = commands::config(None, None, escalate);
            commands::resolve::run(&schemas, rows.as_deref(), &event, config, commit)?;
        }
        Commands::Version => {
            println!("advuuid CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("advuuid Core v{}", advuuid_core::VERSION);
        }
    }

    Ok(())
}
