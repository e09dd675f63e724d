//! Listing scraper
//!
//! One parameterized pipeline for every site:
//!
//! ```text
//! navigating -> classifying -> blocked
//!                           -> awaiting results -> extracting -> ok | unavailable
//! ```
//!
//! Navigating, awaiting results and extracting may each end in `error`. The
//! browser session is torn down on every one of these exits.

mod accumulator;

use anyhow::{Context, Result};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

pub use accumulator::{ListingAccumulator, Offer};

use crate::config::ScrapeConfig;
use crate::detect::{PageState, classify};
use crate::driver::BrowserLauncher;
use crate::extract::extract_card;
use crate::query::SearchQuery;
use crate::result::ResultSet;
use crate::session::ScrapeSession;
use crate::sites::SiteProfile;

/// Step of a scrape call, attached to fatal errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapePhase {
    Launching,
    Navigating,
    Classifying,
    AwaitingResults,
    Extracting,
}

impl fmt::Display for ScrapePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Launching => "launching browser",
            Self::Navigating => "navigating",
            Self::Classifying => "classifying page",
            Self::AwaitingResults => "awaiting results",
            Self::Extracting => "extracting listings",
        })
    }
}

/// Scrapes the first search-results page of one site
pub struct ListingScraper {
    launcher: Arc<dyn BrowserLauncher>,
    profile: SiteProfile,
    config: ScrapeConfig,
}

impl ListingScraper {
    #[must_use]
    pub fn new(launcher: Arc<dyn BrowserLauncher>, profile: SiteProfile, config: ScrapeConfig) -> Self {
        Self {
            launcher,
            profile,
            config,
        }
    }

    #[must_use]
    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    /// Run one scrape call
    ///
    /// Never fails: blocked pages, empty pages and fatal errors all come back
    /// as a `ResultSet` with the matching status.
    pub async fn scrape(&self, query: &SearchQuery) -> ResultSet {
        let platform = self.profile.platform;
        info!("Scraping {platform} for '{query}'");

        let session = match ScrapeSession::open(self.launcher.as_ref(), &self.config)
            .await
            .context(ScrapePhase::Launching)
        {
            Ok(session) => session,
            Err(e) => return self.failed(query, &e),
        };

        let outcome = self.run(&session, query).await;
        session.teardown().await;

        match outcome {
            Ok(result) => {
                info!(
                    "{platform} scrape for '{query}' finished: {} ({} products)",
                    result.status(),
                    result.products().len()
                );
                result
            }
            Err(e) => self.failed(query, &e),
        }
    }

    fn failed(&self, query: &SearchQuery, err: &anyhow::Error) -> ResultSet {
        warn!("{} scrape for '{query}' failed: {:#}", self.profile.platform, err);
        ResultSet::error(query.as_str(), self.profile.failure_message(&format!("{err:#}")))
    }

    async fn run(&self, session: &ScrapeSession, query: &SearchQuery) -> Result<ResultSet> {
        let config = &self.config;
        let strategy = &self.profile.strategy;
        let url = self
            .profile
            .search_url(query, chrono::Utc::now().timestamp_millis());

        debug!("Phase: {}", ScrapePhase::Navigating);
        session
            .navigate(&url, config.navigation_timeout())
            .await
            .context(ScrapePhase::Navigating)?;
        session.settle(config.settle_delay()).await;

        if !self.profile.interstitial_dismiss.is_empty() {
            let report = session
                .dismiss_interstitial(
                    &self.profile.interstitial_dismiss,
                    config.interstitial_click_timeout(),
                    config.interstitial_pause(),
                )
                .await;
            debug!("Interstitial: {report:?}");
        }

        debug!("Phase: {}", ScrapePhase::Classifying);
        let state = classify(session.page(), strategy)
            .await
            .context(ScrapePhase::Classifying)?;
        if let PageState::Blocked { marker } = state {
            info!("{} blocked the request (matched '{marker}')", self.profile.platform);
            return Ok(ResultSet::blocked(query.as_str(), &self.profile.blocked_message));
        }

        let idle = session
            .wait_for_network_idle(config.network_idle_timeout(), config.network_quiet_window())
            .await;
        debug!("Network idle: {idle:?}");

        debug!("Phase: {}", ScrapePhase::AwaitingResults);
        session
            .wait_for_selector(
                &strategy.card,
                config.results_timeout(),
                config.results_poll_interval(),
            )
            .await
            .context(ScrapePhase::AwaitingResults)?;
        session
            .hydrate(
                config.scroll_cycles(),
                config.scroll_distance_px(),
                config.scroll_pause(),
            )
            .await
            .context(ScrapePhase::AwaitingResults)?;

        debug!("Phase: {}", ScrapePhase::Extracting);
        let accumulator = self
            .collect(session)
            .await
            .context(ScrapePhase::Extracting)?;
        Ok(accumulator.finish(query.as_str(), &self.profile.unavailable_message))
    }

    /// Extract cards in document order until the cap is reached
    async fn collect(&self, session: &ScrapeSession) -> Result<ListingAccumulator> {
        let cards = session
            .page()
            .query_all(&self.profile.strategy.card)
            .await
            .context("Failed to enumerate result cards")?;
        debug!("{} result cards on page", cards.len());

        let mut accumulator = ListingAccumulator::new();
        for (index, card) in cards.iter().enumerate() {
            if accumulator.is_full() {
                debug!("Cap reached after {index} cards");
                break;
            }
            let record = extract_card(card.as_ref(), &self.profile).await;
            match accumulator.offer(record) {
                Offer::Accepted => {}
                rejected => trace!("Card {index} rejected: {rejected:?}"),
            }
        }
        Ok(accumulator)
    }
}
