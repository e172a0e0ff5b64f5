//! Generic record operations against PostgreSQL.

use crate::catalog::TableHandle;
use crate::error::AppError;
use crate::response::{Confirmation, PageResult};
use crate::sql::{self, BindValue, ListQuery, QueryBuf};
use serde_json::{Map, Value};
use sqlx::PgPool;

pub struct RecordService;

impl RecordService {
    /// One page of rows plus the unfiltered row count. `total` reports the
    /// whole table even when filters are set; see DESIGN.md.
    pub async fn list(
        pool: &PgPool,
        handle: &TableHandle,
        query: &ListQuery,
    ) -> Result<PageResult, AppError> {
        let buf = sql::select_page(handle, query)?;
        let data = Self::fetch_rows(pool, &buf).await?;

        let count = sql::count_all(handle)?;
        tracing::debug!(sql = %count.sql, "query");
        let total: i64 = sqlx::query_scalar(&count.sql).fetch_one(pool).await?;

        Ok(PageResult {
            page: query.page,
            limit: query.limit,
            total,
            data,
        })
    }

    /// Fetch one row by primary key. Absence is not an error.
    pub async fn get(
        pool: &PgPool,
        handle: &TableHandle,
        id: &str,
    ) -> Result<Option<Value>, AppError> {
        let buf = sql::select_by_id(handle, id)?;
        Self::fetch_optional_row(pool, &buf).await
    }

    /// Insert one row and return the payload merged with the generated
    /// primary-key value.
    pub async fn create(
        pool: &PgPool,
        handle: &TableHandle,
        payload: Map<String, Value>,
    ) -> Result<Value, AppError> {
        let buf = sql::insert(handle, &payload)?;
        tracing::debug!(sql = %buf.sql, params = ?buf.params, "query");
        let mut query = sqlx::query(&buf.sql);
        for p in &buf.params {
            query = query.bind(BindValue::from_json(p));
        }
        let row = query.fetch_one(pool).await?;
        let generated_id = decode_cell(&row, &handle.id_column);

        let mut merged = payload;
        merged.insert(handle.id_column.clone(), generated_id);
        Ok(Value::Object(merged))
    }

    /// Update one row by primary key and return the freshly re-fetched row.
    /// Zero rows affected means the id does not exist.
    pub async fn update(
        pool: &PgPool,
        handle: &TableHandle,
        id: &str,
        payload: Map<String, Value>,
    ) -> Result<Value, AppError> {
        let buf = sql::update(handle, id, &payload)?;
        let affected = Self::execute(pool, &buf).await?;
        if affected == 0 {
            return Err(AppError::NotFound(format!(
                "no record with {} = {} in {}",
                handle.id_column, id, handle.name
            )));
        }
        Self::get(pool, handle, id).await?.ok_or_else(|| {
            AppError::NotFound(format!(
                "no record with {} = {} in {}",
                handle.id_column, id, handle.name
            ))
        })
    }

    /// Delete one row by primary key. Zero rows affected means the id does
    /// not exist.
    pub async fn delete(
        pool: &PgPool,
        handle: &TableHandle,
        id: &str,
    ) -> Result<Confirmation, AppError> {
        let buf = sql::delete(handle, id)?;
        let affected = Self::execute(pool, &buf).await?;
        if affected == 0 {
            return Err(AppError::NotFound(format!(
                "no record with {} = {} in {}",
                handle.id_column, id, handle.name
            )));
        }
        Ok(Confirmation {
            message: format!("record {} deleted from {}", id, handle.name),
        })
    }

    async fn fetch_rows(pool: &PgPool, buf: &QueryBuf) -> Result<Vec<Value>, AppError> {
        tracing::debug!(sql = %buf.sql, params = ?buf.params, "query");
        let mut query = sqlx::query(&buf.sql);
        for p in &buf.params {
            query = query.bind(BindValue::from_json(p));
        }
        let rows = query.fetch_all(pool).await?;
        Ok(rows.iter().map(decode_row).collect())
    }

    async fn fetch_optional_row(pool: &PgPool, buf: &QueryBuf) -> Result<Option<Value>, AppError> {
        tracing::debug!(sql = %buf.sql, params = ?buf.params, "query");
        let mut query = sqlx::query(&buf.sql);
        for p in &buf.params {
            query = query.bind(BindValue::from_json(p));
        }
        let row = query.fetch_optional(pool).await?;
        Ok(row.as_ref().map(decode_row))
    }

    async fn execute(pool: &PgPool, buf: &QueryBuf) -> Result<u64, AppError> {
        tracing::debug!(sql = %buf.sql, params = ?buf.params, "query");
        let mut query = sqlx::query(&buf.sql);
        for p in &buf.params {
            query = query.bind(BindValue::from_json(p));
        }
        let result = query.execute(pool).await?;
        Ok(result.rows_affected())
    }
}

fn decode_row(row: &sqlx::postgres::PgRow) -> Value {
    use sqlx::{Column, Row};
    let mut map = Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), decode_cell(row, name));
    }
    Value::Object(map)
}

/// Decode one cell to JSON by probing the common PostgreSQL types. try_get
/// checks wire-type compatibility, so the first hit wins.
fn decode_cell(row: &sqlx::postgres::PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f32>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n as f64) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(u)) = row.try_get::<Option<uuid::Uuid>, _>(name) {
        return Value::String(u.to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(name) {
        return j;
    }
    Value::Null
}
