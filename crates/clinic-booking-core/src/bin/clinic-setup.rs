//! One-shot setup tool for a clinic store file.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use clinic_booking_core::{Database, StoreConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file (overrides config and CLINIC_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// JSON store config; defaults come from the environment when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply the schema (safe to repeat)
    Init,
    /// Drop every table, dependents first
    Teardown,
    /// Print row counts per table
    Counts,
    /// Print every row as JSON
    Export,
}

fn resolve_config(args: &Args) -> anyhow::Result<StoreConfig> {
    let mut config = match &args.config {
        Some(path) => StoreConfig::from_json_file(path)?,
        None => StoreConfig::from_env()?,
    };
    if let Some(path) = &args.db {
        config.path = Some(path.clone());
    }
    if config.path.is_none() {
        bail!("no database path; pass --db or set {}", clinic_booking_core::config::ENV_DB_PATH);
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;
    let mut db = Database::open_with_config(&config)
        .with_context(|| format!("opening {:?}", config.path))?;

    match args.command {
        Command::Init => {
            for (table, rows) in db.table_counts()? {
                println!("{:<16} ready ({} rows)", table, rows);
            }
        }
        Command::Teardown => {
            db.teardown()?;
            println!("schema dropped");
        }
        Command::Counts => {
            for (table, rows) in db.table_counts()? {
                println!("{:<16} {}", table, rows);
            }
        }
        Command::Export => {
            println!("{}", db.export_snapshot()?.to_json()?);
        }
    }
    Ok(())
}
