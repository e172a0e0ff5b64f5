//! Handlers for the introspecting variant: the table name comes from the
//! path and its metadata is resolved against the catalog on every request.

use crate::catalog;
use crate::error::AppError;
use crate::handlers::{body_to_map, normalize_id, parse_list_query};
use crate::response::TableMeta;
use crate::service::RecordService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

pub async fn meta(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> Result<Json<TableMeta>, AppError> {
    let handle = catalog::resolve(&state.pool, &table).await?;
    Ok(Json(TableMeta::from(&handle)))
}

pub async fn list(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let handle = catalog::resolve(&state.pool, &table).await?;
    let query = parse_list_query(&params, Some(&handle));
    let page = RecordService::list(&state.pool, &handle, &query).await?;
    Ok(Json(page))
}

pub async fn read(
    State(state): State<AppState>,
    Path((table, id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let handle = catalog::resolve(&state.pool, &table).await?;
    let id = normalize_id(&id);
    Ok(match RecordService::get(&state.pool, &handle, &id).await? {
        Some(row) => Json(row).into_response(),
        // Absent records are not an error; the client gets an empty 200.
        None => StatusCode::OK.into_response(),
    })
}

pub async fn create(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let handle = catalog::resolve(&state.pool, &table).await?;
    let payload = body_to_map(body)?;
    let row = RecordService::create(&state.pool, &handle, payload).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update(
    State(state): State<AppState>,
    Path((table, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let handle = catalog::resolve(&state.pool, &table).await?;
    let id = normalize_id(&id);
    let payload = body_to_map(body)?;
    let row = RecordService::update(&state.pool, &handle, &id, payload).await?;
    Ok(Json(row))
}

pub async fn remove(
    State(state): State<AppState>,
    Path((table, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let handle = catalog::resolve(&state.pool, &table).await?;
    let id = normalize_id(&id);
    let confirmation = RecordService::delete(&state.pool, &handle, &id).await?;
    Ok(Json(confirmation))
}
