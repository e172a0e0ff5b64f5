//! Table CRUD route binding.
//! Paths are parameterized on the table name; handlers resolve it per
//! request, either against the catalog or against the startup allow-list.

use crate::allowlist::AllowList;
use crate::handlers::{fixed, tables};
use crate::state::{AppState, FixedState};
use axum::{routing::get, Router};
use sqlx::PgPool;
use std::sync::Arc;

/// Introspecting binder: any table the catalog resolves is served.
/// /:table/meta is declared alongside /:table/:id; the static segment wins,
/// so a record whose id is literally "meta" is shadowed.
pub fn table_routes(state: AppState) -> Router {
    Router::new()
        .route("/:table", get(tables::list).post(tables::create))
        .route("/:table/meta", get(tables::meta))
        .route(
            "/:table/:id",
            get(tables::read).put(tables::update).delete(tables::remove),
        )
        .with_state(state)
}

/// Allow-listed binder: only tables in the startup allow-list are served;
/// everything else is 404 before any database call.
pub fn allowlisted_table_routes(pool: PgPool, allow: Arc<AllowList>) -> Router {
    Router::new()
        .route("/:table", get(fixed::list).post(fixed::create))
        .route("/:table/meta", get(fixed::meta))
        .route(
            "/:table/:id",
            get(fixed::read).put(fixed::update).delete(fixed::remove),
        )
        .with_state(FixedState { pool, tables: allow })
}
