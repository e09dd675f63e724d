//! Maps scrape outcomes onto transport-ready responses
//!
//! The HTTP layer itself lives outside this crate; it only needs a status code
//! and a serializable body, which is what `AssembledResponse` carries.

use serde::Serialize;

use super::types::{Platform, ResultSet, ScrapeStatus};

/// Status code plus body for one scrape response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssembledResponse {
    pub status_code: u16,
    pub body: ResultSet,
}

impl AssembledResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Body as JSON text
    ///
    /// # Errors
    /// Only if serialization fails, which cannot happen for well-formed records.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.body)
    }
}

/// Status code for a scrape outcome
///
/// Blocked maps to 429 so callers back off; fatal failures map to 500.
#[must_use]
pub const fn status_code(status: ScrapeStatus) -> u16 {
    match status {
        ScrapeStatus::Blocked => 429,
        ScrapeStatus::Error => 500,
        ScrapeStatus::Ok | ScrapeStatus::Unavailable => 200,
    }
}

/// Wrap a `ResultSet` for the transport layer
#[must_use]
pub fn assemble(result: ResultSet) -> AssembledResponse {
    AssembledResponse {
        status_code: status_code(result.status()),
        body: result,
    }
}

/// Response for a request that arrived without a usable query
#[must_use]
pub fn assemble_missing_query(platform: Platform) -> AssembledResponse {
    AssembledResponse {
        status_code: 400,
        body: ResultSet::error(
            "",
            format!(
                "Query is required. Example: /api/{}?query=iphone%2015",
                platform.slug()
            ),
        ),
    }
}
