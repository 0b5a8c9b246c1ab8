//! gpt-dash (Dashboard) - Guitar practice tracker visualizations
//!
//! Loads every table once, resolves the sessions and guitars and serves
//! chart data on port 5731. Restart to pick up new sessions.

use anyhow::{Context, Result};
use clap::Parser;
use gpt_common::config::{resolve_root_folder, DatabaseConfig, DEFAULT_DASH_PORT, ENV_ROOT_FOLDER};
use gpt_common::db::{Store, Tables};
use gpt_common::time;
use gpt_dash::{build_router, AppState, DashboardData};
use tracing::info;

/// Command-line arguments for gpt-dash
#[derive(Parser, Debug)]
#[command(name = "gpt-dash")]
#[command(about = "Practice dashboard for the guitar practice tracker")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_DASH_PORT, env = "GPT_DASH_PORT")]
    port: u16,

    /// Root folder holding the local database
    #[arg(short, long, env = "GPT_ROOT_FOLDER")]
    root_folder: Option<String>,
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

    info!("Starting Guitar Practice Tracker dashboard (gpt-dash) v{}", env!("CARGO_PKG_VERSION"));

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), ENV_ROOT_FOLDER);
    info!("Root folder: {}", root_folder.display());

    let config = DatabaseConfig::load(&root_folder).context("Failed to load configuration")?;
    let store = Store::connect(&config)
        .await
        .context("Failed to connect to database")?;
    // The dashboard never writes
    let tables = Tables::load(&store, true)
        .await
        .context("Failed to load tables")?;

    let data = DashboardData::build(&tables, time::today());
    let app = build_router(AppState::new(data));

    let addr = format!("127.0.0.1:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("gpt-dash listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
