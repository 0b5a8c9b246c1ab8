//! gpt-backup - Copy the remote database into the local SQLite file
//!
//! Every table of the configured PostgreSQL store is written, ids intact, into
//! `local_guitar_data.db` under the root folder (or `--output`). Existing rows
//! in the local copy are replaced.

use anyhow::{bail, Context, Result};
use clap::Parser;
use gpt_common::config::{
    resolve_root_folder, DatabaseConfig, StoreLocation, DEFAULT_SCHEMA, ENV_ROOT_FOLDER,
    LOCAL_DB_FILE,
};
use gpt_common::db::{backup_tables, init_database, Store};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "gpt-backup")]
#[command(about = "Back up the guitar practice database to a local SQLite file")]
#[command(version)]
struct Args {
    /// Root folder holding the local database
    #[arg(short, long, env = "GPT_ROOT_FOLDER")]
    root_folder: Option<String>,

    /// Write the backup here instead of the root folder's database file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let root_folder = resolve_root_folder(args.root_folder.as_deref(), ENV_ROOT_FOLDER);
    let config = DatabaseConfig::load(&root_folder).context("Failed to load configuration")?;

    if !matches!(config.location, StoreLocation::Remote(_)) {
        bail!("No remote database configured (set pg_host and pg_dbname)");
    }

    let source = Store::connect(&config)
        .await
        .context("Failed to connect to remote database")?;

    let target_path = args.output.unwrap_or_else(|| root_folder.join(LOCAL_DB_FILE));
    let pool = init_database(&target_path)
        .await
        .with_context(|| format!("Failed to open {}", target_path.display()))?;
    let target = Store::sqlite(pool, DEFAULT_SCHEMA)?;

    let summary = backup_tables(&source, &target).await.context("Backup failed")?;
    info!(
        "Backed up {} rows across {} tables to {}",
        summary.total_rows(),
        summary.tables.len(),
        target_path.display()
    );

    Ok(())
}
