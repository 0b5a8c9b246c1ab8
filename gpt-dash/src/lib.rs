//! gpt-dash library - Practice dashboard service
//!
//! Chart data over JSON. Everything is computed from a [`DashboardData`]
//! snapshot taken at startup.

use axum::Router;
use chrono::NaiveDate;
use gpt_common::db::Tables;
use gpt_common::resolve::{resolve_guitars, resolve_sessions, ResolvedGuitar, ResolvedSession};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod api;

/// Resolved rows the dashboard reports on
///
/// Built once and never refreshed: sessions entered after startup do not
/// appear, and "today" stays the startup date, until the service restarts.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub today: NaiveDate,
    /// Newest first
    pub sessions: Vec<ResolvedSession>,
    pub guitars: Vec<ResolvedGuitar>,
}

impl DashboardData {
    pub fn build(tables: &Tables, today: NaiveDate) -> Self {
        let data = Self {
            today,
            sessions: resolve_sessions(tables),
            guitars: resolve_guitars(tables),
        };
        info!(
            "Dashboard data built for {}: {} sessions, {} guitars",
            today,
            data.sessions.len(),
            data.guitars.len()
        );
        data
    }
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub data: Arc<DashboardData>,
}

impl AppState {
    pub fn new(data: DashboardData) -> Self {
        Self {
            data: Arc::new(data),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::chart_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
