//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::NaiveDate;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    /// Day the dashboard snapshot was taken
    pub data_as_of: NaiveDate,
    pub sessions: usize,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "gpt-dash".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data_as_of: state.data.today,
        sessions: state.data.sessions.len(),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
