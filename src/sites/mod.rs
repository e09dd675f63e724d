//! Site profiles
//!
//! A `SiteProfile` is everything that differs between retail sites: where the
//! search page lives, how cards are marked up, what a block page looks like
//! and which interstitial (if any) must be dismissed first. The listing
//! pipeline itself is shared.

mod amazon;
mod flipkart;
mod strategy;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use strategy::{Candidate, SelectorStrategy};

use crate::error::{ScrapeError, ScrapeResult};
use crate::query::SearchQuery;
use crate::result::Platform;

/// Configuration for one retail site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfile {
    pub platform: Platform,
    /// Origin used for the search page and for resolving relative links
    pub base_url: String,
    /// Path of the search results page, e.g. `/s`
    pub search_path: String,
    /// Query-string key carrying the search term, e.g. `k`
    pub query_param: String,
    pub strategy: SelectorStrategy,
    /// Close buttons of dialogs that cover the results (clicked best-effort)
    #[serde(default)]
    pub interstitial_dismiss: Vec<String>,
    pub blocked_message: String,
    pub unavailable_message: String,
}

impl SiteProfile {
    /// Built-in profile for a platform
    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Amazon => amazon::profile(),
            Platform::Flipkart => flipkart::profile(),
        }
    }

    #[must_use]
    pub fn amazon() -> Self {
        amazon::profile()
    }

    #[must_use]
    pub fn flipkart() -> Self {
        flipkart::profile()
    }

    /// Load a profile from JSON, e.g. to patch selectors after a site redesign
    pub fn from_json_file(path: impl AsRef<Path>) -> ScrapeResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let profile: Self = serde_json::from_str(&raw)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> ScrapeResult<()> {
        let base = url::Url::parse(&self.base_url)
            .map_err(|e| ScrapeError::Profile(format!("invalid base_url '{}': {e}", self.base_url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ScrapeError::Profile(format!(
                "base_url must be http(s), got '{}'",
                self.base_url
            )));
        }
        if !self.search_path.starts_with('/') {
            return Err(ScrapeError::Profile(format!(
                "search_path must start with '/', got '{}'",
                self.search_path
            )));
        }
        if self.query_param.trim().is_empty() {
            return Err(ScrapeError::Profile("query_param cannot be empty".to_string()));
        }
        self.strategy.validate()
    }

    /// Search page URL with a cache-busting `_t` timestamp
    #[must_use]
    pub fn search_url(&self, query: &SearchQuery, timestamp_ms: i64) -> String {
        format!(
            "{}{}?{}={}&_t={}",
            self.base_url.trim_end_matches('/'),
            self.search_path,
            self.query_param,
            query.encoded(),
            timestamp_ms
        )
    }

    /// Message for a scrape that failed outright
    #[must_use]
    pub fn failure_message(&self, cause: &str) -> String {
        format!("{} scraping failed: {cause}", self.platform)
    }
}
