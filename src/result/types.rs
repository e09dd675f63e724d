//! Data structures for product listings and scrape outcomes

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::{MAX_PRODUCTS, UNAVAILABLE};

// =============================================================================
// Platform
// =============================================================================

/// Retail site a record was scraped from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Amazon,
    Flipkart,
}

impl Platform {
    /// Lowercase slug used in endpoint paths and CLI arguments
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Amazon => "amazon",
            Self::Flipkart => "flipkart",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amazon => f.write_str("Amazon"),
            Self::Flipkart => f.write_str("Flipkart"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "amazon" => Ok(Self::Amazon),
            "flipkart" => Ok(Self::Flipkart),
            other => Err(format!("unknown platform '{other}' (expected amazon or flipkart)")),
        }
    }
}

// =============================================================================
// ProductRecord
// =============================================================================

/// One normalized product listing
///
/// Built once per card by the card extractor and never mutated afterwards.
/// Missing text fields hold `"Unavailable"`; missing numeric and URL fields are
/// `None`. Nothing is ever guessed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub platform: Platform,
    pub title: String,
    pub price: Option<u64>,
    pub rating: Option<f64>,
    /// Absolute detail-page URL
    pub url: Option<String>,
    pub image: Option<String>,
    pub coupon: String,
}

impl ProductRecord {
    /// Whether the record may be returned to a caller
    ///
    /// A record without a title or a detail URL is noise (ads, separators,
    /// skeleton placeholders) and is always dropped.
    #[must_use]
    pub fn is_listable(&self) -> bool {
        self.title != UNAVAILABLE && self.url.is_some()
    }
}

// =============================================================================
// ResultSet
// =============================================================================

/// Outcome class of one scrape call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeStatus {
    Ok,
    Blocked,
    Unavailable,
    Error,
}

impl fmt::Display for ScrapeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "ok",
            Self::Blocked => "blocked",
            Self::Unavailable => "unavailable",
            Self::Error => "error",
        })
    }
}

/// Final result of one scrape call
///
/// Fields are private so the only way to build one is through the status
/// constructors below:
/// - `ok` holds 1..=20 products with pairwise distinct URLs
/// - every other status holds no products and a message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    #[serde(skip_serializing_if = "String::is_empty")]
    query: String,
    status: ScrapeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    products: Vec<ProductRecord>,
}

impl ResultSet {
    /// Successful result
    ///
    /// Returns `None` when `products` breaks the `ok` invariant (empty, over
    /// the cap, unlisted records or repeated URLs).
    #[must_use]
    pub fn ok(query: impl Into<String>, products: Vec<ProductRecord>) -> Option<Self> {
        if products.is_empty() || products.len() > MAX_PRODUCTS {
            return None;
        }
        let mut seen = std::collections::HashSet::with_capacity(products.len());
        for product in &products {
            if !product.is_listable() {
                return None;
            }
            if let Some(url) = &product.url
                && !seen.insert(url.as_str())
            {
                return None;
            }
        }
        Some(Self {
            query: query.into(),
            status: ScrapeStatus::Ok,
            message: None,
            count: Some(products.len()),
            products,
        })
    }

    #[must_use]
    pub fn blocked(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::empty(query, ScrapeStatus::Blocked, message)
    }

    #[must_use]
    pub fn unavailable(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::empty(query, ScrapeStatus::Unavailable, message)
    }

    #[must_use]
    pub fn error(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::empty(query, ScrapeStatus::Error, message)
    }

    fn empty(query: impl Into<String>, status: ScrapeStatus, message: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            status,
            message: Some(message.into()),
            count: None,
            products: Vec::new(),
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn status(&self) -> ScrapeStatus {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub fn count(&self) -> Option<usize> {
        self.count
    }

    #[must_use]
    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    #[must_use]
    pub fn into_products(self) -> Vec<ProductRecord> {
        self.products
    }
}
