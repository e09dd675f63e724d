//! chromiumoxide implementation of the automation capability

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{BrowserLauncher, BrowserSession, CardHandle, PageHandle, SessionSettings, stealth};
use crate::browser_setup::{launch_browser, resolve_browser_executable};

/// Launches one chromium process per session from a resolved executable
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    executable: PathBuf,
}

impl ChromiumLauncher {
    #[must_use]
    pub fn new(executable: PathBuf) -> Self {
        Self { executable }
    }

    /// Resolve the executable (env override, system install, managed download)
    pub async fn discover() -> Result<Self> {
        let executable = resolve_browser_executable().await?;
        Ok(Self::new(executable))
    }

    #[must_use]
    pub fn executable(&self) -> &std::path::Path {
        &self.executable
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self, settings: &SessionSettings) -> Result<Box<dyn BrowserSession>> {
        let (browser, handler, user_data_dir) = launch_browser(&self.executable, settings).await?;
        Ok(Box::new(ChromiumSession {
            wrapper: BrowserWrapper::new(browser, handler, user_data_dir),
        }))
    }
}

/// Wrapper for Browser and its event handler task
///
/// Ensures handler is properly cleaned up when browser is dropped.
/// Handler MUST be aborted to prevent it running indefinitely after
/// browser is closed.
struct BrowserWrapper {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl BrowserWrapper {
    fn new(browser: Browser, handler: JoinHandle<()>, user_data_dir: PathBuf) -> Self {
        Self {
            browser,
            handler,
            user_data_dir: Some(user_data_dir),
        }
    }

    /// Clean up temp directory (blocking operation)
    ///
    /// MUST be called AFTER `browser.wait()` completes so Chrome has released
    /// all file handles.
    fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            debug!("Cleaning up temp directory: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(
                    "Failed to clean up temp directory {}: {}. Manual cleanup may be required.",
                    path.display(),
                    e
                );
            }
        }
    }
}

impl Drop for BrowserWrapper {
    fn drop(&mut self) {
        self.handler.abort();
        // Browser::drop() kills the Chrome process if close() never ran
        if self.user_data_dir.is_some() {
            warn!("BrowserWrapper dropped without explicit close - removing temp dir in Drop");
            self.cleanup_temp_dir();
        }
    }
}

struct ChromiumSession {
    wrapper: BrowserWrapper,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn new_page(&mut self, settings: &SessionSettings) -> Result<Box<dyn PageHandle>> {
        let page = self
            .wrapper
            .browser
            .new_page("about:blank")
            .await
            .context("Failed to create blank page")?;

        if let Err(e) = stealth::enhance_page(&page, settings).await {
            // Close the tab here; the caller never receives a handle for it
            if let Err(close_err) = page.clone().close().await {
                warn!("Failed to close page after setup error: {}", close_err);
            }
            return Err(e.context("Failed to configure page"));
        }

        Ok(Box::new(ChromiumPage { page }))
    }

    async fn close(mut self: Box<Self>) -> Result<()> {
        info!("Closing browser session");

        let close_result = self.wrapper.browser.close().await;
        if let Err(e) = self.wrapper.browser.wait().await {
            warn!("Failed to wait for browser exit: {}", e);
        }
        self.wrapper.cleanup_temp_dir();

        close_result
            .map(|_| ())
            .context("Failed to close browser cleanly")
    }
}

struct ChromiumPage {
    page: Page,
}

/// Resource timing entries the page may buffer before it stops recording
///
/// The browser default is 250, which a product grid fills before it settles.
pub(crate) const RESOURCE_TIMING_BUFFER_SIZE: usize = 10_000;

/// Whether the document has been parsed (DOMContentLoaded has fired)
const DOCUMENT_PARSED_JS: &str =
    "document.readyState !== 'loading' && location.href !== 'about:blank'";

const NAVIGATION_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Tracks a growing counter until it holds still for a quiet window
#[derive(Debug)]
struct QuietTracker {
    quiet_window: Duration,
    last_seen: Option<usize>,
    quiet_since: Instant,
}

impl QuietTracker {
    fn new(quiet_window: Duration, now: Instant) -> Self {
        Self {
            quiet_window,
            last_seen: None,
            quiet_since: now,
        }
    }

    /// Record a sample; true once the count has been unchanged for the window
    fn observe(&mut self, count: usize, now: Instant) -> bool {
        if self.last_seen != Some(count) {
            self.last_seen = Some(count);
            self.quiet_since = now;
            return false;
        }
        now.duration_since(self.quiet_since) >= self.quiet_window
    }
}

/// JSON-quote a selector for embedding into an evaluated expression
fn js_string(value: &str) -> Result<String> {
    serde_json::to_string(value).context("Failed to quote selector")
}

#[async_trait]
impl PageHandle for ChromiumPage {
    async fn goto(&self, url: &str) -> Result<()> {
        // `Page::goto` would hold out for the load event, which ad and
        // tracker requests on listing pages can delay well past the budget.
        // Issue the raw command and stop once the document is parsed.
        let response = self
            .page
            .execute(NavigateParams::new(url))
            .await
            .with_context(|| format!("Failed to navigate to {url}"))?;
        if let Some(error_text) = &response.result.error_text {
            anyhow::bail!("Failed to navigate to {url}: {error_text}");
        }

        loop {
            match self.page.evaluate(DOCUMENT_PARSED_JS).await {
                Ok(result) => {
                    if result.into_value::<bool>().unwrap_or(false) {
                        debug!("DOMContentLoaded reached for {}", url);
                        return Ok(());
                    }
                }
                Err(e) => {
                    // Context swaps during commit surface as evaluate errors
                    debug!("Failed to check readyState: {}, retrying", e);
                }
            }
            tokio::time::sleep(NAVIGATION_POLL_INTERVAL).await;
        }
    }

    async fn body_text(&self) -> Result<String> {
        let text: Option<String> = self
            .page
            .evaluate("document.body ? (document.body.innerText || document.body.textContent || '') : ''")
            .await
            .context("Failed to read page text")?
            .into_value()
            .context("Page text was not a string")?;
        Ok(text.unwrap_or_default())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let expression = format!("document.querySelectorAll({}).length", js_string(selector)?);
        let count: usize = self
            .page
            .evaluate(expression)
            .await
            .with_context(|| format!("Failed to count '{selector}'"))?
            .into_value()
            .context("Element count was not a number")?;
        Ok(count)
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn CardHandle>>> {
        // Zero matches is a normal answer here, not an error
        if self.count(selector).await? == 0 {
            return Ok(Vec::new());
        }
        let elements = self
            .page
            .find_elements(selector)
            .await
            .with_context(|| format!("Failed to find elements for '{selector}'"))?;
        Ok(elements
            .into_iter()
            .map(|element| Box::new(ChromiumCard { element }) as Box<dyn CardHandle>)
            .collect())
    }

    async fn click_first(&self, selector: &str) -> Result<bool> {
        let Ok(element) = self.page.find_element(selector).await else {
            return Ok(false);
        };
        element
            .click()
            .await
            .with_context(|| format!("Failed to click '{selector}'"))?;
        Ok(true)
    }

    async fn scroll_by(&self, delta_y: i64) -> Result<()> {
        self.page
            .evaluate(format!("window.scrollBy(0, {delta_y})"))
            .await
            .context("Failed to scroll page")?;
        Ok(())
    }

    async fn wait_for_network_idle(&self, quiet_window: Duration) -> Result<()> {
        // Chromium has no direct "network idle" signal over CDP; watch the
        // resource timing buffer until it stops growing for `quiet_window`.
        let poll_interval = Duration::from_millis(100).min(quiet_window);
        let mut tracker = QuietTracker::new(quiet_window, Instant::now());

        // Documents created before the init script ran still have the 250
        // entry default; once full, the count would freeze and look idle.
        self.page
            .evaluate(format!(
                "performance.setResourceTimingBufferSize({RESOURCE_TIMING_BUFFER_SIZE})"
            ))
            .await
            .context("Failed to enlarge resource timing buffer")?;

        loop {
            let entries: usize = self
                .page
                .evaluate("performance.getEntriesByType('resource').length")
                .await
                .context("Failed to read resource timings")?
                .into_value()
                .context("Resource timing count was not a number")?;

            if tracker.observe(entries, Instant::now()) {
                return Ok(());
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let ChromiumPage { page } = *self;
        page.close().await.context("Failed to close page")
    }
}

struct ChromiumCard {
    element: Element,
}

impl ChromiumCard {
    async fn first_match(&self, selector: &str) -> Result<Option<Element>> {
        // chromiumoxide reports "no node" as an error; a card missing an
        // optional field is expected, so an empty match is `None`.
        match self.element.find_elements(selector).await {
            Ok(elements) => Ok(elements.into_iter().next()),
            Err(e) => {
                let message = e.to_string().to_lowercase();
                if message.contains("could not find node") || message.contains("no node") {
                    Ok(None)
                } else {
                    Err(anyhow::Error::new(e)
                        .context(format!("Failed to query '{selector}' inside card")))
                }
            }
        }
    }
}

#[async_trait]
impl CardHandle for ChromiumCard {
    async fn first_text(&self, selector: &str) -> Result<Option<String>> {
        match self.first_match(selector).await? {
            Some(element) => element
                .inner_text()
                .await
                .with_context(|| format!("Failed to read text of '{selector}'")),
            None => Ok(None),
        }
    }

    async fn first_attribute(&self, selector: &str, attribute: &str) -> Result<Option<String>> {
        match self.first_match(selector).await? {
            Some(element) => element
                .attribute(attribute)
                .await
                .with_context(|| format!("Failed to read {attribute} of '{selector}'")),
            None => Ok(None),
        }
    }
}
