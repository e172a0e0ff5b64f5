//! SimulaBank generic table API: one router serves paginated, filtered,
//! sorted CRUD over any table the catalog (or a static allow-list) resolves.

pub mod allowlist;
pub mod catalog;
pub mod error;
pub mod response;
pub mod sql;
pub mod state;
pub mod service;
pub mod handlers;
pub mod routes;

pub use allowlist::AllowList;
pub use catalog::{resolve, ColumnMeta, TableHandle};
pub use error::AppError;
pub use response::{Confirmation, PageResult, TableMeta};
pub use routes::{allowlisted_table_routes, common_routes, common_routes_with_ready, table_routes};
pub use service::RecordService;
pub use state::{AppState, FixedState};
