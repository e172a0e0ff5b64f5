pub mod common;
pub mod tables;

pub use common::{common_routes, common_routes_with_ready};
pub use tables::{allowlisted_table_routes, table_routes};
