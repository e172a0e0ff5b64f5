//! Request handlers for both route-binder variants, plus the shared
//! query-string and body parsing they dispatch through.

pub mod fixed;
pub mod tables;

use crate::catalog::TableHandle;
use crate::error::AppError;
use crate::sql::{ListQuery, SortOrder};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Query parameters with paging/sorting meaning; everything else is a
/// candidate column filter.
const RESERVED_PARAMS: &[&str] = &["page", "limit", "sortBy", "order"];

/// Build a ListQuery from the raw query string. Defaults: page 1, limit 10,
/// ascending. Only a case-insensitive literal `desc` flips the order. When a
/// handle with catalog columns is given, filters and sortBy naming unknown
/// columns are dropped; without one (allow-list variant) they pass through.
pub(crate) fn parse_list_query(
    params: &HashMap<String, String>,
    handle: Option<&TableHandle>,
) -> ListQuery {
    let known = |col: &str| match handle {
        Some(h) => h.has_column(col),
        None => true,
    };

    let page = params
        .get("page")
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(1);
    let limit = params
        .get("limit")
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(10);
    let order = match params.get("order") {
        Some(v) if v.eq_ignore_ascii_case("desc") => SortOrder::Desc,
        _ => SortOrder::Asc,
    };
    let sort_by = params
        .get("sortBy")
        .filter(|col| known(col.as_str()))
        .cloned();

    let mut filters: Vec<(String, String)> = params
        .iter()
        .filter(|(k, _)| !RESERVED_PARAMS.contains(&k.as_str()))
        .filter(|(k, _)| known(k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    // Query-string maps iterate in arbitrary order; keep clause order stable.
    filters.sort();

    ListQuery {
        page,
        limit,
        filters,
        sort_by,
        order,
    }
}

pub(crate) fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// Path ids compare against the key column's text form; uuids canonicalize
/// to lowercase there, so match that before comparing.
pub(crate) fn normalize_id(id: &str) -> String {
    match uuid::Uuid::parse_str(id) {
        Ok(u) => u.to_string(),
        Err(_) => id.to_string(),
    }
}
