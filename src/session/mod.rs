//! Session driver
//!
//! Owns one browser session and its single page for the duration of a scrape
//! call. Steps come in two failure-tolerance levels:
//!
//! - mandatory steps (`navigate`, `wait_for_selector`, `hydrate`) return
//!   `Result`; an error ends the scrape with `status=error`
//! - best-effort steps (`wait_for_network_idle`, `dismiss_interstitial`)
//!   return a `BestEffort` report and never fail the scrape
//!
//! `teardown` consumes the session, so it runs at most once by construction;
//! the listing scraper calls it on every exit path.

pub mod timeout;

use anyhow::{Context, Result};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

use crate::config::ScrapeConfig;
use crate::driver::{BrowserLauncher, BrowserSession, PageHandle};
use timeout::with_timeout;

/// Outcome of a step whose failure does not end the scrape
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BestEffort {
    /// Step ran to completion
    Completed,
    /// Nothing to do (e.g. no interstitial on this page)
    Skipped,
    /// Step failed or ran out of time; the scrape continues
    Abandoned { reason: String },
}

/// A launched browser session with one open page
pub struct ScrapeSession {
    session: Box<dyn BrowserSession>,
    page: Box<dyn PageHandle>,
}

impl ScrapeSession {
    /// Launch an isolated session and open its page
    ///
    /// If the page cannot be opened the freshly launched session is closed
    /// before the error is returned.
    pub async fn open(launcher: &dyn BrowserLauncher, config: &ScrapeConfig) -> Result<Self> {
        let settings = config.session_settings();
        let mut session = with_timeout(
            launcher.launch(&settings),
            config.launch_timeout(),
            "Browser launch",
        )
        .await?;

        match session.new_page(&settings).await {
            Ok(page) => {
                info!("Browser session opened");
                Ok(Self { session, page })
            }
            Err(e) => {
                if let Err(close_err) = session.close().await {
                    warn!("Failed to close session after page error: {:#}", close_err);
                }
                Err(e.context("Failed to open page"))
            }
        }
    }

    /// The page owned by this session
    #[must_use]
    pub fn page(&self) -> &dyn PageHandle {
        self.page.as_ref()
    }

    /// Navigate and wait for the DOM to be parsed
    pub async fn navigate(&self, url: &str, budget: Duration) -> Result<()> {
        debug!("Navigating to {url}");
        with_timeout(self.page.goto(url), budget, "Page navigation").await
    }

    /// Fixed pause for client-side rendering
    pub async fn settle(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// Click the first matching interstitial close button, if any
    pub async fn dismiss_interstitial(
        &self,
        selectors: &[String],
        click_timeout: Duration,
        pause: Duration,
    ) -> BestEffort {
        for selector in selectors {
            match with_timeout(self.page.click_first(selector), click_timeout, "Interstitial click")
                .await
            {
                Ok(true) => {
                    debug!("Dismissed interstitial via '{selector}'");
                    self.settle(pause).await;
                    return BestEffort::Completed;
                }
                Ok(false) => trace!("No interstitial matched '{selector}'"),
                Err(e) => {
                    warn!("Interstitial dismissal failed, continuing: {:#}", e);
                    return BestEffort::Abandoned {
                        reason: format!("{e:#}"),
                    };
                }
            }
        }
        BestEffort::Skipped
    }

    /// Wait for network quiescence, giving up silently after `budget`
    ///
    /// Sites routinely keep long-polling and analytics connections open, so
    /// running out of time here is expected and not an error.
    pub async fn wait_for_network_idle(&self, budget: Duration, quiet_window: Duration) -> BestEffort {
        match with_timeout(
            self.page.wait_for_network_idle(quiet_window),
            budget,
            "Network idle wait",
        )
        .await
        {
            Ok(()) => BestEffort::Completed,
            Err(e) => {
                debug!("Network never went idle, continuing: {:#}", e);
                BestEffort::Abandoned {
                    reason: format!("{e:#}"),
                }
            }
        }
    }

    /// Poll until `selector` matches at least one element
    ///
    /// Lookup errors while polling count as "not there yet" (the document may
    /// be mid-replacement); only running out of `budget` fails.
    pub async fn wait_for_selector(
        &self,
        selector: &str,
        budget: Duration,
        poll_interval: Duration,
    ) -> Result<()> {
        let start = Instant::now();
        let poll = async {
            loop {
                match self.page.count(selector).await {
                    Ok(count) if count > 0 => {
                        debug!("'{selector}' present after {:?}", start.elapsed());
                        return anyhow::Ok(());
                    }
                    Ok(_) => {}
                    Err(e) => trace!("Selector poll failed: {:#}", e),
                }
                tokio::time::sleep(poll_interval).await;
            }
        };
        with_timeout(poll, budget, "Results selector wait")
            .await
            .with_context(|| format!("Results container '{selector}' never appeared"))
    }

    /// Scroll-and-pause cycles so lazily loaded images and prices render
    pub async fn hydrate(&self, cycles: u32, distance_px: i64, pause: Duration) -> Result<()> {
        for cycle in 0..cycles {
            self.page
                .scroll_by(distance_px)
                .await
                .with_context(|| format!("Hydration scroll {} failed", cycle + 1))?;
            self.settle(pause).await;
        }
        Ok(())
    }

    /// Close the page, then the session
    ///
    /// Failures are logged; there is nothing useful a caller could do with
    /// them and they must not mask the scrape outcome.
    pub async fn teardown(self) {
        let Self { session, page } = self;
        if let Err(e) = page.close().await {
            warn!("Failed to close page: {:#}", e);
        }
        if let Err(e) = session.close().await {
            warn!("Failed to close browser session: {:#}", e);
        }
        info!("Browser session closed");
    }
}
