//! Handlers for the allow-listed variant: the table must be in the static
//! allow-list, and unknown names are rejected before any database call.

use crate::error::AppError;
use crate::handlers::{body_to_map, normalize_id, parse_list_query};
use crate::response::TableMeta;
use crate::service::RecordService;
use crate::state::FixedState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

fn lookup(state: &FixedState, table: &str) -> Result<crate::catalog::TableHandle, AppError> {
    state
        .tables
        .handle_for(table)
        .ok_or_else(|| AppError::NotFound(format!("unknown table {}", table)))
}

pub async fn meta(
    State(state): State<FixedState>,
    Path(table): Path<String>,
) -> Result<Json<TableMeta>, AppError> {
    let handle = lookup(&state, &table)?;
    Ok(Json(TableMeta::from(&handle)))
}

pub async fn list(
    State(state): State<FixedState>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let handle = lookup(&state, &table)?;
    // No catalog columns here: every non-reserved param passes through as a
    // filter and unknown columns fail at the database.
    let query = parse_list_query(&params, None);
    let page = RecordService::list(&state.pool, &handle, &query).await?;
    Ok(Json(page))
}

pub async fn read(
    State(state): State<FixedState>,
    Path((table, id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let handle = lookup(&state, &table)?;
    let id = normalize_id(&id);
    Ok(match RecordService::get(&state.pool, &handle, &id).await? {
        Some(row) => Json(row).into_response(),
        None => StatusCode::OK.into_response(),
    })
}

pub async fn create(
    State(state): State<FixedState>,
    Path(table): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let handle = lookup(&state, &table)?;
    let payload = body_to_map(body)?;
    let row = RecordService::create(&state.pool, &handle, payload).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update(
    State(state): State<FixedState>,
    Path((table, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let handle = lookup(&state, &table)?;
    let id = normalize_id(&id);
    let payload = body_to_map(body)?;
    let row = RecordService::update(&state.pool, &handle, &id, payload).await?;
    Ok(Json(row))
}

pub async fn remove(
    State(state): State<FixedState>,
    Path((table, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let handle = lookup(&state, &table)?;
    let id = normalize_id(&id);
    let confirmation = RecordService::delete(&state.pool, &handle, &id).await?;
    Ok(Json(confirmation))
}
