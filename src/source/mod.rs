//! Upstream side: the raw record shape and a streaming JSON reader for it.
pub mod reader;
pub mod types;

pub use reader::read_records;
pub use types::RawRecord;
