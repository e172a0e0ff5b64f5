//! Response body shapes.

use crate::catalog::TableHandle;
use serde::Serialize;
use serde_json::Value;

/// One page of records plus paging bookkeeping. `total` is the unfiltered
/// table row count.
#[derive(Serialize)]
pub struct PageResult {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub data: Vec<Value>,
}

/// Table metadata for client-side form building.
#[derive(Serialize)]
pub struct TableMeta {
    pub table: String,
    #[serde(rename = "idField")]
    pub id_field: String,
    pub columns: Vec<String>,
}

impl From<&TableHandle> for TableMeta {
    fn from(handle: &TableHandle) -> Self {
        TableMeta {
            table: handle.name.clone(),
            id_field: handle.id_column.clone(),
            columns: handle.columns.iter().map(|c| c.name.clone()).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct Confirmation {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ColumnMeta;
    use serde_json::json;

    #[test]
    fn meta_uses_wire_field_names_and_keeps_column_order() {
        let handle = TableHandle {
            name: "equipos".into(),
            id_column: "id_equipo".into(),
            columns: vec![
                ColumnMeta { name: "id_equipo".into(), udt: "int4".into() },
                ColumnMeta { name: "nombre".into(), udt: "varchar".into() },
            ],
        };
        let v = serde_json::to_value(TableMeta::from(&handle)).unwrap();
        assert_eq!(
            v,
            json!({
                "table": "equipos",
                "idField": "id_equipo",
                "columns": ["id_equipo", "nombre"]
            })
        );
    }

    #[test]
    fn page_result_shape() {
        let v = serde_json::to_value(PageResult {
            page: 2,
            limit: 5,
            total: 12,
            data: vec![json!({"id_equipo": 6})],
        })
        .unwrap();
        assert_eq!(v["page"], 2);
        assert_eq!(v["limit"], 5);
        assert_eq!(v["total"], 12);
        assert_eq!(v["data"].as_array().unwrap().len(), 1);
    }
}
