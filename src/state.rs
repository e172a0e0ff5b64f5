//! Shared application state for the route variants.

use crate::allowlist::AllowList;
use sqlx::PgPool;
use std::sync::Arc;

/// State for the introspecting routes and the common routes.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

/// State for the allow-listed routes: the table map is loaded once at
/// startup and never mutated.
#[derive(Clone)]
pub struct FixedState {
    pub pool: PgPool,
    pub tables: Arc<AllowList>,
}
