//! Core configuration type for listing scrapes
//!
//! `ScrapeConfig` holds every timing and identity knob of the session driver.
//! Defaults reproduce a patient desktop visitor from India; tests shrink the
//! timings to milliseconds.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::driver::SessionSettings;
use crate::error::{ScrapeError, ScrapeResult};

/// Main configuration struct for listing scrapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub(crate) headless: bool,
    pub(crate) user_agent: String,
    pub(crate) locale: String,
    pub(crate) accept_language: String,
    pub(crate) viewport_width: u32,
    pub(crate) viewport_height: u32,

    /// Budget for starting the browser and connecting to it
    ///
    /// Default: 30 seconds
    pub(crate) launch_timeout_ms: u64,

    /// Timeout for navigation up to DOM parse
    ///
    /// Default: 60 seconds
    pub(crate) navigation_timeout_ms: u64,

    /// Fixed pause after DOM parse
    ///
    /// Default: 1.5 seconds
    pub(crate) settle_delay_ms: u64,

    /// Budget for the best-effort network quiescence wait
    ///
    /// Running out is logged and ignored.
    ///
    /// Default: 15 seconds
    pub(crate) network_idle_timeout_ms: u64,
    pub(crate) network_quiet_window_ms: u64,

    /// Budget for the results container to appear
    ///
    /// Running out ends the scrape with `status=error`.
    ///
    /// Default: 30 seconds
    pub(crate) results_timeout_ms: u64,
    pub(crate) results_poll_interval_ms: u64,

    pub(crate) scroll_cycles: u32,
    pub(crate) scroll_distance_px: i64,
    pub(crate) scroll_pause_ms: u64,

    pub(crate) interstitial_click_timeout_ms: u64,
    pub(crate) interstitial_pause_ms: u64,

    /// Browser sessions `PriceScout` lets run at once
    pub(crate) max_concurrent_sessions: usize,

    /// Parent directory for per-session browser profiles
    pub(crate) profile_root: Option<PathBuf>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self::builder().into_config()
    }
}

impl ScrapeConfig {
    /// Load a configuration from a JSON file
    ///
    /// Missing keys fall back to defaults; the result is validated.
    pub fn from_json_file(path: impl AsRef<Path>) -> ScrapeResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> ScrapeResult<()> {
        let timeouts = [
            ("launch_timeout_ms", self.launch_timeout_ms),
            ("navigation_timeout_ms", self.navigation_timeout_ms),
            ("network_idle_timeout_ms", self.network_idle_timeout_ms),
            ("results_timeout_ms", self.results_timeout_ms),
            ("results_poll_interval_ms", self.results_poll_interval_ms),
            ("interstitial_click_timeout_ms", self.interstitial_click_timeout_ms),
        ];
        if let Some((name, _)) = timeouts.iter().find(|(_, value)| *value == 0) {
            return Err(ScrapeError::Config(format!("{name} must be greater than zero")));
        }
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(ScrapeError::Config("viewport must be non-empty".to_string()));
        }
        if self.max_concurrent_sessions == 0 {
            return Err(ScrapeError::Config(
                "max_concurrent_sessions must be at least 1".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ScrapeError::Config("user_agent cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Identity and emulation settings handed to the browser layer
    #[must_use]
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            headless: self.headless,
            user_agent: self.user_agent.clone(),
            locale: self.locale.clone(),
            accept_language: self.accept_language.clone(),
            viewport_width: self.viewport_width,
            viewport_height: self.viewport_height,
            navigation_timeout: self.navigation_timeout(),
            profile_root: self.profile_root.clone(),
        }
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub fn viewport(&self) -> (u32, u32) {
        (self.viewport_width, self.viewport_height)
    }

    #[must_use]
    pub fn launch_timeout(&self) -> Duration {
        Duration::from_millis(self.launch_timeout_ms)
    }

    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    #[must_use]
    pub fn network_idle_timeout(&self) -> Duration {
        Duration::from_millis(self.network_idle_timeout_ms)
    }

    #[must_use]
    pub fn network_quiet_window(&self) -> Duration {
        Duration::from_millis(self.network_quiet_window_ms)
    }

    #[must_use]
    pub fn results_timeout(&self) -> Duration {
        Duration::from_millis(self.results_timeout_ms)
    }

    #[must_use]
    pub fn results_poll_interval(&self) -> Duration {
        Duration::from_millis(self.results_poll_interval_ms)
    }

    #[must_use]
    pub fn scroll_cycles(&self) -> u32 {
        self.scroll_cycles
    }

    #[must_use]
    pub fn scroll_distance_px(&self) -> i64 {
        self.scroll_distance_px
    }

    #[must_use]
    pub fn scroll_pause(&self) -> Duration {
        Duration::from_millis(self.scroll_pause_ms)
    }

    #[must_use]
    pub fn interstitial_click_timeout(&self) -> Duration {
        Duration::from_millis(self.interstitial_click_timeout_ms)
    }

    #[must_use]
    pub fn interstitial_pause(&self) -> Duration {
        Duration::from_millis(self.interstitial_pause_ms)
    }

    #[must_use]
    pub fn max_concurrent_sessions(&self) -> usize {
        self.max_concurrent_sessions
    }

    #[must_use]
    pub fn profile_root(&self) -> Option<&Path> {
        self.profile_root.as_deref()
    }
}
