//! Table read, form rendering and form submission
//!
//! GET    /api/entities               - entity namespaces and titles
//! GET    /api/:entity                - summary table
//! GET    /api/:entity/form?id=       - input form (new record without id)
//! POST   /api/:entity                - submit a form, returns the new summary
//! DELETE /api/:entity/:id            - delete a row, returns the new summary

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use gpt_common::db::WriteOp;
use gpt_common::models::Entity;
use gpt_common::resolve::SummaryTable;
use gpt_common::{time, Error};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ApiError;
use crate::forms::{model_for, FormSubmission, InputForm, InputTableModel};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct EntityInfo {
    pub namespace: &'static str,
    pub title: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct FormQuery {
    pub id: Option<i64>,
}

fn model(namespace: &str) -> Result<&'static dyn InputTableModel, ApiError> {
    Entity::from_namespace(namespace)
        .map(model_for)
        .ok_or_else(|| ApiError(Error::NotFound(format!("Unknown table: {}", namespace))))
}

/// GET /api/entities
pub async fn list_entities() -> Json<Vec<EntityInfo>> {
    Json(
        Entity::ALL
            .iter()
            .map(|e| EntityInfo {
                namespace: e.namespace(),
                title: e.title(),
            })
            .collect(),
    )
}

/// GET /api/:entity
pub async fn get_summary(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> Result<Json<SummaryTable>, ApiError> {
    let model = model(&namespace)?;
    let tables = state.tables.lock().await;
    Ok(Json(model.summary(&tables)))
}

/// GET /api/:entity/form
pub async fn get_form(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
    Query(query): Query<FormQuery>,
) -> Result<Json<InputForm>, ApiError> {
    let model = model(&namespace)?;
    let tables = state.tables.lock().await;
    Ok(Json(model.form(&tables, query.id, time::today())?))
}

/// POST /api/:entity
///
/// The table lock is held from the read-only check until the last reload, so
/// a planned sequence never interleaves with another write.
pub async fn submit_form(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
    Json(submission): Json<FormSubmission>,
) -> Result<Json<SummaryTable>, ApiError> {
    let model = model(&namespace)?;
    let mut tables = state.tables.lock().await;
    if tables.is_read_only(model.entity()) {
        return Err(Error::ReadOnly(model.namespace().to_string()).into());
    }

    let ops = model.plan_submit(&tables, &submission)?;
    tables.apply_all(&state.store, &ops).await?;
    info!("Saved {} form ({} writes)", model.namespace(), ops.len());
    Ok(Json(model.summary(&tables)))
}

/// DELETE /api/:entity/:id
pub async fn delete_row(
    State(state): State<AppState>,
    Path((namespace, id)): Path<(String, i64)>,
) -> Result<Json<SummaryTable>, ApiError> {
    let model = model(&namespace)?;
    let mut tables = state.tables.lock().await;
    if tables.is_read_only(model.entity()) {
        return Err(Error::ReadOnly(model.namespace().to_string()).into());
    }

    tables
        .apply(&state.store, &WriteOp::delete(model.entity(), id))
        .await?;
    Ok(Json(model.summary(&tables)))
}

pub fn entity_routes() -> Router<AppState> {
    Router::new()
        .route("/api/entities", get(list_entities))
        .route("/api/:entity", get(get_summary).post(submit_form))
        .route("/api/:entity/form", get(get_form))
        .route("/api/:entity/:id", delete(delete_row))
}
