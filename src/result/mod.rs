//! Product records, result sets and their transport mapping

mod assembler;
mod types;

pub use assembler::{AssembledResponse, assemble, assemble_missing_query, status_code};
pub use types::{Platform, ProductRecord, ResultSet, ScrapeStatus};
