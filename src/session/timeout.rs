//! Timeout utilities for page operations
//!
//! Every wait in a scrape is bounded. These wrappers turn an elapsed budget
//! into a `ScrapeError::Timeout` carried inside the `anyhow` chain.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;

use crate::error::ScrapeError;

/// Build the timeout error for `operation`
fn timeout_error(operation: &str, budget: Duration) -> anyhow::Error {
    anyhow::Error::new(ScrapeError::Timeout {
        operation: operation.to_string(),
        millis: u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
    })
}

/// Run `operation` with an explicit timeout
///
/// # Returns
/// * `Ok(T)` - Operation completed successfully
/// * `Err` - Either the operation failed or the timeout was reached
pub async fn with_timeout<F, T>(operation: F, budget: Duration, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(budget, operation).await {
        Ok(result) => result,
        Err(_) => Err(timeout_error(operation_name, budget)),
    }
}
