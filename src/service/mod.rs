//! Record operations over resolved table handles.

pub mod records;

pub use records::RecordService;
