//! Fluent builder for `ScrapeConfig`
//!
//! Every field has a default, so `ScrapeConfig::builder().build()` is always
//! valid; `build()` re-checks whatever the caller overrode.

use std::path::PathBuf;
use std::time::Duration;

use super::types::ScrapeConfig;
use crate::error::ScrapeResult;
use crate::utils::{
    CHROME_USER_AGENT, DEFAULT_ACCEPT_LANGUAGE, DEFAULT_INTERSTITIAL_CLICK_TIMEOUT_MS,
    DEFAULT_INTERSTITIAL_PAUSE_MS, DEFAULT_LAUNCH_TIMEOUT_MS, DEFAULT_LOCALE,
    DEFAULT_MAX_CONCURRENT_SESSIONS, DEFAULT_NAVIGATION_TIMEOUT_MS, DEFAULT_NETWORK_IDLE_TIMEOUT_MS,
    DEFAULT_NETWORK_QUIET_WINDOW_MS, DEFAULT_RESULTS_POLL_INTERVAL_MS,
    DEFAULT_RESULTS_TIMEOUT_MS, DEFAULT_SCROLL_CYCLES, DEFAULT_SCROLL_DISTANCE_PX,
    DEFAULT_SCROLL_PAUSE_MS, DEFAULT_SETTLE_DELAY_MS, DEFAULT_VIEWPORT_HEIGHT,
    DEFAULT_VIEWPORT_WIDTH,
};

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Debug, Clone)]
pub struct ScrapeConfigBuilder {
    config: ScrapeConfig,
}

impl Default for ScrapeConfigBuilder {
    fn default() -> Self {
        Self {
            config: ScrapeConfig {
                headless: true,
                user_agent: CHROME_USER_AGENT.to_string(),
                locale: DEFAULT_LOCALE.to_string(),
                accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
                viewport_width: DEFAULT_VIEWPORT_WIDTH,
                viewport_height: DEFAULT_VIEWPORT_HEIGHT,
                launch_timeout_ms: DEFAULT_LAUNCH_TIMEOUT_MS,
                navigation_timeout_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
                settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
                network_idle_timeout_ms: DEFAULT_NETWORK_IDLE_TIMEOUT_MS,
                network_quiet_window_ms: DEFAULT_NETWORK_QUIET_WINDOW_MS,
                results_timeout_ms: DEFAULT_RESULTS_TIMEOUT_MS,
                results_poll_interval_ms: DEFAULT_RESULTS_POLL_INTERVAL_MS,
                scroll_cycles: DEFAULT_SCROLL_CYCLES,
                scroll_distance_px: DEFAULT_SCROLL_DISTANCE_PX,
                scroll_pause_ms: DEFAULT_SCROLL_PAUSE_MS,
                interstitial_click_timeout_ms: DEFAULT_INTERSTITIAL_CLICK_TIMEOUT_MS,
                interstitial_pause_ms: DEFAULT_INTERSTITIAL_PAUSE_MS,
                max_concurrent_sessions: DEFAULT_MAX_CONCURRENT_SESSIONS,
                profile_root: None,
            },
        }
    }
}

impl ScrapeConfig {
    /// Create a builder for configuring a `ScrapeConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder {
        ScrapeConfigBuilder::default()
    }

    /// Builder seeded with this configuration, for overriding a loaded file
    #[must_use]
    pub fn into_builder(self) -> ScrapeConfigBuilder {
        ScrapeConfigBuilder { config: self }
    }
}

impl ScrapeConfigBuilder {
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Locale plus the matching Accept-Language header
    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>, accept_language: impl Into<String>) -> Self {
        self.config.locale = locale.into();
        self.config.accept_language = accept_language.into();
        self
    }

    #[must_use]
    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.viewport_width = width;
        self.config.viewport_height = height;
        self
    }

    #[must_use]
    pub fn launch_timeout(mut self, timeout: Duration) -> Self {
        self.config.launch_timeout_ms = millis(timeout);
        self
    }

    #[must_use]
    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.config.navigation_timeout_ms = millis(timeout);
        self
    }

    #[must_use]
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay_ms = millis(delay);
        self
    }

    #[must_use]
    pub fn network_idle(mut self, timeout: Duration, quiet_window: Duration) -> Self {
        self.config.network_idle_timeout_ms = millis(timeout);
        self.config.network_quiet_window_ms = millis(quiet_window);
        self
    }

    #[must_use]
    pub fn results_timeout(mut self, timeout: Duration) -> Self {
        self.config.results_timeout_ms = millis(timeout);
        self
    }

    #[must_use]
    pub fn results_poll_interval(mut self, interval: Duration) -> Self {
        self.config.results_poll_interval_ms = millis(interval);
        self
    }

    #[must_use]
    pub fn scroll(mut self, cycles: u32, distance_px: i64, pause: Duration) -> Self {
        self.config.scroll_cycles = cycles;
        self.config.scroll_distance_px = distance_px;
        self.config.scroll_pause_ms = millis(pause);
        self
    }

    #[must_use]
    pub fn interstitial(mut self, click_timeout: Duration, pause: Duration) -> Self {
        self.config.interstitial_click_timeout_ms = millis(click_timeout);
        self.config.interstitial_pause_ms = millis(pause);
        self
    }

    #[must_use]
    pub fn max_concurrent_sessions(mut self, sessions: usize) -> Self {
        self.config.max_concurrent_sessions = sessions;
        self
    }

    #[must_use]
    pub fn profile_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.profile_root = Some(root.into());
        self
    }

    pub(crate) fn into_config(self) -> ScrapeConfig {
        self.config
    }

    /// Validate and return the configuration
    ///
    /// # Errors
    /// `ScrapeError::Config` when a timeout is zero, the viewport is empty,
    /// the user agent is blank or concurrency is zero.
    pub fn build(self) -> ScrapeResult<ScrapeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
