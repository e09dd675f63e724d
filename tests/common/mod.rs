//! In-memory automation layer for driving the listing pipeline without a browser

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use kodegen_tools_pricescout::{
    BrowserLauncher, BrowserSession, CardHandle, PageHandle, ScrapeConfig, SessionSettings,
};

/// One fake result card: selector -> text, (selector, attribute) -> value
#[derive(Debug, Clone, Default)]
pub struct FakeCard {
    texts: HashMap<String, String>,
    attributes: HashMap<(String, String), String>,
    failing: HashSet<String>,
}

#[allow(dead_code)]
impl FakeCard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, selector: &str, value: &str) -> Self {
        self.texts.insert(selector.to_string(), value.to_string());
        self
    }

    pub fn attr(mut self, selector: &str, attribute: &str, value: &str) -> Self {
        self.attributes
            .insert((selector.to_string(), attribute.to_string()), value.to_string());
        self
    }

    /// Every lookup of `selector` errors, as if the node was detached
    pub fn failing(mut self, selector: &str) -> Self {
        self.failing.insert(selector.to_string());
        self
    }

    /// A complete amazon.in search result card
    pub fn amazon(title: &str, href: &str, price: &str) -> Self {
        Self::new()
            .text("h2 span", title)
            .text(".a-price .a-offscreen", price)
            .text(".a-icon-alt", "4.3 out of 5 stars")
            .attr("h2 a", "href", href)
            .attr("img", "src", "https://m.media-amazon.com/images/I/x.jpg")
    }
}

#[async_trait]
impl CardHandle for FakeCard {
    async fn first_text(&self, selector: &str) -> Result<Option<String>> {
        if self.failing.contains(selector) {
            return Err(anyhow!("node for '{selector}' is detached"));
        }
        Ok(self.texts.get(selector).cloned())
    }

    async fn first_attribute(&self, selector: &str, attribute: &str) -> Result<Option<String>> {
        if self.failing.contains(selector) {
            return Err(anyhow!("node for '{selector}' is detached"));
        }
        Ok(self
            .attributes
            .get(&(selector.to_string(), attribute.to_string()))
            .cloned())
    }
}

/// How clicking the interstitial close button misbehaves
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickFault {
    /// The click reports an error
    Error,
    /// The click never resolves
    Hang,
}

/// What the fake search page looks like
#[derive(Debug, Clone, Default)]
pub struct FakeSite {
    pub card_selector: String,
    pub body_text: String,
    pub element_counts: HashMap<String, usize>,
    pub results_appear: bool,
    pub cards: Vec<FakeCard>,
    pub interstitial: Option<String>,
    pub click_fault: Option<ClickFault>,
    pub navigation_fails: bool,
    pub network_never_idle: bool,
    pub navigation_delay: Duration,
    pub launch_delay: Duration,
}

#[allow(dead_code)]
impl FakeSite {
    pub fn with_cards(card_selector: &str, cards: Vec<FakeCard>) -> Self {
        Self {
            card_selector: card_selector.to_string(),
            body_text: "Results".to_string(),
            results_appear: true,
            cards,
            ..Self::default()
        }
    }
}

/// Shared counters observed by the tests
#[derive(Debug, Default)]
pub struct Counters {
    pub launches: AtomicUsize,
    pub pages_opened: AtomicUsize,
    pub pages_closed: AtomicUsize,
    pub sessions_closed: AtomicUsize,
    pub clicks: AtomicUsize,
    pub active_sessions: AtomicUsize,
    pub peak_sessions: AtomicUsize,
    pub visited: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl Counters {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

pub struct FakeLauncher {
    site: Arc<FakeSite>,
    counters: Arc<Counters>,
    fail_new_page: bool,
}

#[allow(dead_code)]
impl FakeLauncher {
    pub fn new(site: FakeSite) -> (Arc<Self>, Arc<Counters>) {
        Self::build(site, false)
    }

    /// Launches fine but can never open a page
    pub fn without_pages(site: FakeSite) -> (Arc<Self>, Arc<Counters>) {
        Self::build(site, true)
    }

    fn build(site: FakeSite, fail_new_page: bool) -> (Arc<Self>, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let launcher = Arc::new(Self {
            site: Arc::new(site),
            counters: Arc::clone(&counters),
            fail_new_page,
        });
        (launcher, counters)
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self, _settings: &SessionSettings) -> Result<Box<dyn BrowserSession>> {
        if !self.site.launch_delay.is_zero() {
            tokio::time::sleep(self.site.launch_delay).await;
        }
        self.counters.launches.fetch_add(1, Ordering::SeqCst);
        let active = self.counters.active_sessions.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.peak_sessions.fetch_max(active, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            site: Arc::clone(&self.site),
            counters: Arc::clone(&self.counters),
            fail_new_page: self.fail_new_page,
        }))
    }
}

struct FakeSession {
    site: Arc<FakeSite>,
    counters: Arc<Counters>,
    fail_new_page: bool,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn new_page(&mut self, _settings: &SessionSettings) -> Result<Box<dyn PageHandle>> {
        if self.fail_new_page {
            return Err(anyhow!("target crashed"));
        }
        self.counters.pages_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakePage {
            site: Arc::clone(&self.site),
            counters: Arc::clone(&self.counters),
        }))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.counters.sessions_closed.fetch_add(1, Ordering::SeqCst);
        self.counters.active_sessions.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FakePage {
    site: Arc<FakeSite>,
    counters: Arc<Counters>,
}

#[async_trait]
impl PageHandle for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.counters.visited.lock().unwrap().push(url.to_string());
        if !self.site.navigation_delay.is_zero() {
            tokio::time::sleep(self.site.navigation_delay).await;
        }
        if self.site.navigation_fails {
            return Err(anyhow!("net::ERR_CONNECTION_RESET"));
        }
        Ok(())
    }

    async fn body_text(&self) -> Result<String> {
        Ok(self.site.body_text.clone())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        if selector == self.site.card_selector {
            return Ok(if self.site.results_appear {
                self.site.cards.len()
            } else {
                0
            });
        }
        Ok(self.site.element_counts.get(selector).copied().unwrap_or(0))
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn CardHandle>>> {
        if selector != self.site.card_selector || !self.site.results_appear {
            return Ok(Vec::new());
        }
        Ok(self
            .site
            .cards
            .iter()
            .cloned()
            .map(|card| Box::new(card) as Box<dyn CardHandle>)
            .collect())
    }

    async fn click_first(&self, selector: &str) -> Result<bool> {
        if self.site.interstitial.as_deref() == Some(selector) {
            self.counters.clicks.fetch_add(1, Ordering::SeqCst);
            match self.site.click_fault {
                Some(ClickFault::Error) => {
                    return Err(anyhow!("Node is detached from document"));
                }
                Some(ClickFault::Hang) => std::future::pending::<()>().await,
                None => {}
            }
            return Ok(true);
        }
        Ok(false)
    }

    async fn scroll_by(&self, _delta_y: i64) -> Result<()> {
        Ok(())
    }

    async fn wait_for_network_idle(&self, _quiet_window: Duration) -> Result<()> {
        if self.site.network_never_idle {
            std::future::pending::<()>().await;
        }
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.counters.pages_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Millisecond timings so scenarios run instantly
#[allow(dead_code)]
pub fn fast_config() -> ScrapeConfig {
    ScrapeConfig::builder()
        .navigation_timeout(Duration::from_secs(2))
        .settle_delay(Duration::ZERO)
        .network_idle(Duration::from_millis(50), Duration::from_millis(5))
        .results_timeout(Duration::from_millis(200))
        .results_poll_interval(Duration::from_millis(10))
        .scroll(3, 1800, Duration::ZERO)
        .interstitial(Duration::from_millis(100), Duration::ZERO)
        .build()
        .unwrap()
}
