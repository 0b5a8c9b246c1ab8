//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use gpt_common::models::Entity;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    /// Whether form submissions are currently refused
    pub read_only: bool,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let read_only = state.tables.lock().await.is_read_only(Entity::Session);
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "gpt-de".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        read_only,
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
