//! SQL text construction and parameter binding.

pub mod builder;
pub mod ident;
pub mod params;

pub use builder::{count_all, delete, insert, select_by_id, select_page, update, ListQuery, QueryBuf, SortOrder};
pub use params::BindValue;
