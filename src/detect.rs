//! Block-page detection
//!
//! Retail sites answer suspected bots with HTTP 200 and a captcha page, so the
//! only reliable signal is the page content. Classification must happen before
//! waiting for the results container: a block page never renders it, and the
//! wait would otherwise end as a timeout error instead of `blocked`.

use anyhow::{Context, Result};
use tracing::debug;

use crate::driver::PageHandle;
use crate::sites::SelectorStrategy;

/// Classification of a loaded page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    /// No block markers; safe to wait for results
    Clear,
    /// Site challenged the session; `marker` is the phrase or selector that matched
    Blocked { marker: String },
}

impl PageState {
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

/// First block phrase contained in `text`, ignoring case
#[must_use]
pub fn find_block_phrase<'a>(text: &str, phrases: &'a [String]) -> Option<&'a str> {
    let haystack = text.to_lowercase();
    phrases
        .iter()
        .find(|phrase| haystack.contains(&phrase.to_lowercase()))
        .map(String::as_str)
}

/// Classify the current page as clear or blocked
///
/// # Errors
/// Only when the page cannot be read at all; that is a fatal failure for the
/// scrape, not a classification.
pub async fn classify(page: &dyn PageHandle, strategy: &SelectorStrategy) -> Result<PageState> {
    let text = page.body_text().await.context("Failed to read page text")?;
    if let Some(phrase) = find_block_phrase(&text, &strategy.block_phrases) {
        debug!("Block phrase matched: {phrase}");
        return Ok(PageState::Blocked {
            marker: phrase.to_string(),
        });
    }

    for selector in &strategy.block_selectors {
        let count = page
            .count(selector)
            .await
            .with_context(|| format!("Failed to look for block marker '{selector}'"))?;
        if count > 0 {
            debug!("Block element present: {selector}");
            return Ok(PageState::Blocked {
                marker: selector.clone(),
            });
        }
    }

    Ok(PageState::Clear)
}
