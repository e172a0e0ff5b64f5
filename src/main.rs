//! Server binary: reads env config, connects the pool, picks the route-binder
//! variant (allow-listed when TABLE_ALLOWLIST is set, introspecting otherwise),
//! and serves the API under /api.

use axum::Router;
use simulabank_api::{
    allowlisted_table_routes, common_routes_with_ready, table_routes, AllowList, AppState,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tracing_subscriber::EnvFilter;

const MAX_BODY_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("simulabank_api=info".parse()?),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/simulabank".into());
    let max_connections: u32 = std::env::var("POOL_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await?;
    let state = AppState { pool: pool.clone() };

    let api = match std::env::var("TABLE_ALLOWLIST") {
        Ok(path) => {
            let raw = tokio::fs::read_to_string(&path).await?;
            let allow = Arc::new(AllowList::from_json(&raw)?);
            tracing::info!(tables = ?allow.table_names(), "serving allow-listed tables");
            allowlisted_table_routes(pool, allow)
        }
        Err(_) => {
            tracing::info!("serving all tables with a primary key (catalog introspection)");
            table_routes(state.clone())
        }
    };

    let app = Router::new()
        .merge(common_routes_with_ready(state))
        .nest("/api", api)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
