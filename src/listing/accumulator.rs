//! Dedup and cap for accepted product records

use std::collections::HashSet;

use crate::result::{ProductRecord, ResultSet};
use crate::utils::MAX_PRODUCTS;

/// What happened to one offered record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    Accepted,
    /// Missing title or detail URL
    Unlisted,
    /// URL already accepted earlier in this call
    Duplicate,
    /// Cap already reached; nothing more is taken
    Full,
}

/// Collects records in card order, first-seen URL wins
#[derive(Debug, Default)]
pub struct ListingAccumulator {
    seen: HashSet<String>,
    products: Vec<ProductRecord>,
}

impl ListingAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offer(&mut self, record: ProductRecord) -> Offer {
        if self.is_full() {
            return Offer::Full;
        }
        if !record.is_listable() {
            return Offer::Unlisted;
        }
        let Some(url) = record.url.as_deref() else {
            return Offer::Unlisted;
        };
        if !self.seen.insert(url.to_string()) {
            return Offer::Duplicate;
        }
        self.products.push(record);
        Offer::Accepted
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.products.len() >= MAX_PRODUCTS
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// `ok` with the accepted records, or `unavailable` when none were accepted
    #[must_use]
    pub fn finish(self, query: &str, unavailable_message: &str) -> ResultSet {
        ResultSet::ok(query, self.products)
            .unwrap_or_else(|| ResultSet::unavailable(query, unavailable_message))
    }
}
