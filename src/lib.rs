//! Browser-driven product listing search
//!
//! Visits a retail site's search page in a real browser, tells block pages
//! apart from genuine results and extracts up to twenty normalized product
//! records. Values that cannot be read are reported as missing, never guessed.

pub mod automation;
pub mod browser_setup;
pub mod config;
pub mod detect;
pub mod driver;
pub mod error;
pub mod extract;
pub mod listing;
pub mod query;
pub mod result;
pub mod service;
pub mod session;
pub mod sites;
pub mod utils;

pub use automation::{Automation, automation, init_automation};
pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::{ScrapeConfig, ScrapeConfigBuilder};
pub use detect::PageState;
pub use driver::{BrowserLauncher, BrowserSession, CardHandle, ChromiumLauncher, PageHandle, SessionSettings};
pub use error::{ScrapeError, ScrapeResult};
pub use extract::{absolute_url, extract_card, parse_price, parse_rating};
pub use listing::{ListingScraper, ScrapePhase};
pub use query::SearchQuery;
pub use result::{
    AssembledResponse, Platform, ProductRecord, ResultSet, ScrapeStatus, assemble,
    assemble_missing_query,
};
pub use service::PriceScout;
pub use session::{BestEffort, ScrapeSession};
pub use sites::{Candidate, SelectorStrategy, SiteProfile};
