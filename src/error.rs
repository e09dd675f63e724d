//! Error types for listing scrapes
//!
//! Page-state outcomes (blocked, no listings) are *not* errors; they are
//! ordinary `ResultSet` values. `ScrapeError` covers invalid input, missing
//! browser automation and the fatal failures that end a scrape call.

use thiserror::Error;

/// Result type alias for scrape operations
pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// Error types for scrape operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Query was empty or whitespace-only
    #[error("Search query cannot be empty or whitespace-only")]
    EmptyQuery,

    /// Browser automation could not be initialised for this process
    #[error("Browser automation unavailable: {0}")]
    AutomationUnavailable(String),

    /// A bounded wait ran out
    #[error("{operation} timeout after {millis}ms")]
    Timeout { operation: String, millis: u64 },

    /// Failure reported by the automation layer
    #[error("Browser error: {0}")]
    Browser(String),

    /// Invalid site profile or selector strategy
    #[error("Invalid site profile: {0}")]
    Profile(String),

    /// Invalid scrape configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error while loading profiles or configuration
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<anyhow::Error> for ScrapeError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the whole context chain
        Self::Browser(format!("{err:#}"))
    }
}
