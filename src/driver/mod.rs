//! Browser-automation capability
//!
//! The listing pipeline only needs a handful of page operations, so it talks
//! to these traits rather than to chromiumoxide directly. `chromium` provides
//! the production implementation; tests plug in an in-memory page.
//!
//! Handle lifetimes follow the browser: a `CardHandle` is only meaningful while
//! the `PageHandle` it came from is open, and a `PageHandle` only while its
//! `BrowserSession` is open. None of them implement comparison; anything that
//! must be compared (URLs for dedup) is derived data.

pub mod chromium;
mod stealth;

use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

pub use chromium::ChromiumLauncher;

/// Per-session browser identity and emulation settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub headless: bool,
    pub user_agent: String,
    pub locale: String,
    pub accept_language: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Navigation budget; CDP command timeouts must not be shorter
    pub navigation_timeout: Duration,
    /// Parent directory for throwaway browser profiles (system temp when `None`)
    pub profile_root: Option<PathBuf>,
}

/// Starts isolated browser sessions
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// Launch a fresh, isolated session
    async fn launch(&self, settings: &SessionSettings) -> Result<Box<dyn BrowserSession>>;
}

/// One running browser with its own profile
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Open a blank page configured with `settings`
    async fn new_page(&mut self, settings: &SessionSettings) -> Result<Box<dyn PageHandle>>;

    /// Shut the browser down and release its profile
    async fn close(self: Box<Self>) -> Result<()>;
}

/// One open tab
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Navigate and wait until the DOM has been parsed
    async fn goto(&self, url: &str) -> Result<()>;

    /// Visible text of the document body (empty when there is no body)
    async fn body_text(&self) -> Result<String>;

    /// Number of elements matching `selector`
    async fn count(&self, selector: &str) -> Result<usize>;

    /// All elements matching `selector`, in document order
    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn CardHandle>>>;

    /// Click the first element matching `selector`
    ///
    /// Returns `Ok(false)` when nothing matched.
    async fn click_first(&self, selector: &str) -> Result<bool>;

    /// Scroll the viewport vertically by `delta_y` pixels
    async fn scroll_by(&self, delta_y: i64) -> Result<()>;

    /// Resolve once no new network resources were seen for `quiet_window`
    ///
    /// Never returns on pages with persistent background traffic; callers
    /// must bound it with a timeout.
    async fn wait_for_network_idle(&self, quiet_window: Duration) -> Result<()>;

    /// Close the tab
    async fn close(self: Box<Self>) -> Result<()>;
}

/// One rendered element, usually a result card
#[async_trait]
pub trait CardHandle: Send + Sync {
    /// Inner text of the first descendant matching `selector`
    async fn first_text(&self, selector: &str) -> Result<Option<String>>;

    /// Attribute value of the first descendant matching `selector`
    async fn first_attribute(&self, selector: &str, attribute: &str) -> Result<Option<String>>;
}
