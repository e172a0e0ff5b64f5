//! Table metadata resolution against the PostgreSQL catalog.
//!
//! A [`TableHandle`] is resolved once per request and threaded through the
//! query builder and record service; nothing is cached across requests.

use crate::error::AppError;
use crate::sql::ident;
use sqlx::PgPool;

/// Primary-key columns of a table, in constraint order. The first one is the
/// id column used for get/update/delete.
const PRIMARY_KEY_SQL: &str = r#"
    SELECT a.attname::text
    FROM pg_catalog.pg_constraint c
    JOIN pg_catalog.pg_class t ON t.oid = c.conrelid
    JOIN pg_catalog.pg_namespace n ON n.oid = t.relnamespace
    JOIN pg_catalog.pg_attribute a ON a.attrelid = t.oid AND a.attnum = ANY(c.conkey)
    WHERE n.nspname = current_schema()
      AND t.relname = $1
      AND c.contype = 'p'
    ORDER BY array_position(c.conkey, a.attnum)
"#;

const COLUMNS_SQL: &str = r#"
    SELECT column_name::text, udt_name::text
    FROM information_schema.columns
    WHERE table_schema = current_schema()
      AND table_name = $1
    ORDER BY ordinal_position
"#;

#[derive(Clone, Debug)]
pub struct ColumnMeta {
    pub name: String,
    /// Catalog type name (`udt_name`), used to cast insert/update placeholders.
    pub udt: String,
}

/// Binding of a table name to its primary-key column and column list, valid
/// for the duration of one request.
#[derive(Clone, Debug)]
pub struct TableHandle {
    pub name: String,
    pub id_column: String,
    /// Catalog columns in ordinal order. Empty when the handle came from a
    /// static allow-list entry instead of the catalog.
    pub columns: Vec<ColumnMeta>,
}

impl TableHandle {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn udt_of(&self, name: &str) -> Option<&str> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.udt.as_str())
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Discover the primary key and column list for `table`. Fails with 404 when
/// the table has no primary key (which also covers tables that do not exist).
pub async fn resolve(pool: &PgPool, table: &str) -> Result<TableHandle, AppError> {
    ident::validate(table)?;
    tracing::debug!(table = %table, "resolving table metadata");

    let id_column: Option<String> = sqlx::query_scalar(PRIMARY_KEY_SQL)
        .bind(table)
        .fetch_optional(pool)
        .await?;
    let id_column = id_column
        .ok_or_else(|| AppError::NotFound(format!("no primary key found for table {}", table)))?;

    let columns: Vec<(String, String)> = sqlx::query_as(COLUMNS_SQL)
        .bind(table)
        .fetch_all(pool)
        .await?;

    Ok(TableHandle {
        name: table.to_string(),
        id_column,
        columns: columns
            .into_iter()
            .map(|(name, udt)| ColumnMeta { name, udt })
            .collect(),
    })
}
