//! Caller-facing search service
//!
//! Every scrape launches its own browser, so `PriceScout` bounds how many run
//! at once with a semaphore. Calls past the bound queue for a permit.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::automation::automation;
use crate::config::ScrapeConfig;
use crate::driver::BrowserLauncher;
use crate::error::{ScrapeError, ScrapeResult};
use crate::listing::ListingScraper;
use crate::query::SearchQuery;
use crate::result::{AssembledResponse, Platform, ResultSet, assemble, assemble_missing_query};
use crate::sites::SiteProfile;

/// Product search across the supported sites
#[derive(Clone)]
pub struct PriceScout {
    launcher: Arc<dyn BrowserLauncher>,
    config: ScrapeConfig,
    permits: Arc<Semaphore>,
    profiles: HashMap<Platform, SiteProfile>,
}

impl PriceScout {
    #[must_use]
    pub fn new(launcher: Arc<dyn BrowserLauncher>, config: ScrapeConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent_sessions()));
        Self {
            launcher,
            config,
            permits,
            profiles: HashMap::new(),
        }
    }

    /// Service backed by the process-wide automation state
    ///
    /// # Errors
    /// `AutomationUnavailable` unless `init_automation` succeeded.
    pub fn from_automation(config: ScrapeConfig) -> ScrapeResult<Self> {
        Ok(Self::new(automation()?, config))
    }

    /// Replace the built-in profile for `profile.platform`
    #[must_use]
    pub fn with_profile(mut self, profile: SiteProfile) -> Self {
        self.profiles.insert(profile.platform, profile);
        self
    }

    #[must_use]
    pub fn profile(&self, platform: Platform) -> SiteProfile {
        self.profiles
            .get(&platform)
            .cloned()
            .unwrap_or_else(|| SiteProfile::for_platform(platform))
    }

    #[must_use]
    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Scrape one site for `raw_query`
    ///
    /// # Errors
    /// Only for an invalid query; scrape failures are `status=error` results.
    pub async fn search(&self, platform: Platform, raw_query: &str) -> ScrapeResult<ResultSet> {
        let query = SearchQuery::parse(raw_query)?;
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| ScrapeError::Browser(format!("session limiter closed: {e}")))?;
        debug!(
            "Acquired session permit ({} left)",
            self.permits.available_permits()
        );

        let scraper = ListingScraper::new(
            Arc::clone(&self.launcher),
            self.profile(platform),
            self.config.clone(),
        );
        Ok(scraper.scrape(&query).await)
    }

    /// Scrape and map the outcome onto a transport response
    pub async fn search_response(&self, platform: Platform, raw_query: &str) -> AssembledResponse {
        match self.search(platform, raw_query).await {
            Ok(result) => assemble(result),
            Err(ScrapeError::EmptyQuery) => assemble_missing_query(platform),
            Err(e) => AssembledResponse {
                status_code: 500,
                body: ResultSet::error(
                    raw_query.trim(),
                    self.profile(platform).failure_message(&e.to_string()),
                ),
            },
        }
    }
}
