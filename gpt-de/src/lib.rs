//! gpt-de library - Data Entry service
//!
//! JSON API over the table-read and form-submission boundaries. One input
//! table model per entity renders forms, validates submissions and plans the
//! writes; the handlers apply them.

use axum::Router;
use gpt_common::db::{Store, Tables};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod forms;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    /// Raw tables, locked for the whole of each write sequence
    pub tables: Arc<Mutex<Tables>>,
}

impl AppState {
    pub fn new(store: Store, tables: Tables) -> Self {
        Self {
            store,
            tables: Arc::new(Mutex::new(tables)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::entity_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
