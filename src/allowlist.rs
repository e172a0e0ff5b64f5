//! Static table allow-list for the minimalist deployment.
//!
//! A JSON object mapping table name to primary-key column, loaded once at
//! startup. Unknown tables fail closed before any database call.

use crate::catalog::TableHandle;
use crate::error::AppError;
use crate::sql::ident;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub struct AllowList {
    tables: BTreeMap<String, String>,
}

impl AllowList {
    /// Parse `{"table": "id_column", ...}` and validate every name up front,
    /// so a bad entry fails the process at startup instead of a request.
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let tables: BTreeMap<String, String> = serde_json::from_str(raw)
            .map_err(|e| AppError::Config(format!("allow-list is not a string map: {}", e)))?;
        if tables.is_empty() {
            return Err(AppError::Config("allow-list is empty".into()));
        }
        for (table, id_column) in &tables {
            ident::validate(table)
                .and_then(|_| ident::validate(id_column))
                .map_err(|e| AppError::Config(format!("allow-list entry {:?}: {}", table, e)))?;
        }
        Ok(AllowList { tables })
    }

    /// Handle for a listed table, with an empty column list (no catalog
    /// introspection in this variant). None for unlisted names.
    pub fn handle_for(&self, table: &str) -> Option<TableHandle> {
        self.tables.get(table).map(|id_column| TableHandle {
            name: table.to_string(),
            id_column: id_column.clone(),
            columns: Vec::new(),
        })
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(|s| s.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_resolves_listed_tables() {
        let list = AllowList::from_json(r#"{"usuarios": "id", "equipos": "id_equipo"}"#).unwrap();
        let handle = list.handle_for("equipos").unwrap();
        assert_eq!(handle.name, "equipos");
        assert_eq!(handle.id_column, "id_equipo");
        assert!(handle.columns.is_empty());
        assert_eq!(list.table_names(), vec!["equipos", "usuarios"]);
    }

    #[test]
    fn unlisted_tables_fail_closed() {
        let list = AllowList::from_json(r#"{"usuarios": "id"}"#).unwrap();
        assert!(list.handle_for("clientes").is_none());
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(AllowList::from_json("[]").is_err());
        assert!(AllowList::from_json("{}").is_err());
        assert!(AllowList::from_json(r#"{"": "id"}"#).is_err());
        assert!(AllowList::from_json(r#"{"usuarios": ""}"#).is_err());
    }
}
