//! gpt-de (Data Entry) - Guitar practice tracker input service
//!
//! Serves the table navigator and the input forms for every entity over a
//! JSON API on port 5730.

use anyhow::{Context, Result};
use clap::Parser;
use gpt_common::config::{resolve_root_folder, DatabaseConfig, DEFAULT_DE_PORT, ENV_ROOT_FOLDER};
use gpt_common::db::{Store, Tables};
use gpt_de::{build_router, AppState};
use tracing::info;

/// Command-line arguments for gpt-de
#[derive(Parser, Debug)]
#[command(name = "gpt-de")]
#[command(about = "Data entry service for the guitar practice tracker")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_DE_PORT, env = "GPT_DE_PORT")]
    port: u16,

    /// Root folder holding the local database
    #[arg(short, long, env = "GPT_ROOT_FOLDER")]
    root_folder: Option<String>,

    /// Open every table read-only (overrides GPT_READ_ONLY and the config file)
    #[arg(long)]
    read_only: bool,
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

    info!("Starting Guitar Practice Tracker data entry (gpt-de) v{}", env!("CARGO_PKG_VERSION"));

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), ENV_ROOT_FOLDER);
    info!("Root folder: {}", root_folder.display());

    let mut config = DatabaseConfig::load(&root_folder).context("Failed to load configuration")?;
    config.read_only |= args.read_only;
    if config.read_only {
        info!("Tables opened read-only, form submissions will be refused");
    }

    let store = Store::connect(&config)
        .await
        .context("Failed to connect to database")?;
    let tables = Tables::load(&store, config.read_only)
        .await
        .context("Failed to load tables")?;

    let app = build_router(AppState::new(store, tables));

    let addr = format!("127.0.0.1:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("gpt-de listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
