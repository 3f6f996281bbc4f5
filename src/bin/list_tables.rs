//! Print the tables (or other schema objects) of a SQLite store on one line.
//!
//! Usage:
//!   list-tables
//!   list-tables --store instance/app.db --kind view
//!   list-tables --json

use anyhow::{Context, Result};
use clap::Parser;
use maintkit::{IntrospectConfig, ObjectKind, list_objects};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "list-tables")]
#[command(about = "List schema objects recorded in a SQLite store")]
struct Cli {
    /// Store to inspect; defaults to the configured store path.
    #[arg(long)]
    store: Option<PathBuf>,
    /// Object kind to list.
    #[arg(long, value_enum, default_value_t = ObjectKind::Table)]
    kind: ObjectKind,
    /// Emit the catalog as a JSON object.
    #[arg(long)]
    json: bool,
}

fn main() {
    maintkit::logging::init();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = IntrospectConfig::from_env();
    if let Some(store) = cli.store {
        config.store_location = store;
    }
    config.kind = cli.kind;

    let catalog = list_objects(&config.store_location, config.kind)
        .with_context(|| format!("listing {} objects", config.kind))?;

    if cli.json {
        println!("{}", serde_json::to_string(&catalog)?);
    } else {
        println!("{}", catalog.summary_line());
    }
    Ok(())
}
