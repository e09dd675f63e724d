//! Selector strategy: ordered candidate selectors per product field

use serde::{Deserialize, Serialize};

use crate::error::{ScrapeError, ScrapeResult};

/// Where a field's value is read from on the matched element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Candidate {
    /// Trimmed inner text of the first element matching the selector
    Text(String),
    /// Attribute of the first element matching the selector
    Attribute { selector: String, attribute: String },
}

impl Candidate {
    #[must_use]
    pub fn text(selector: &str) -> Self {
        Self::Text(selector.to_string())
    }

    #[must_use]
    pub fn attribute(selector: &str, attribute: &str) -> Self {
        Self::Attribute {
            selector: selector.to_string(),
            attribute: attribute.to_string(),
        }
    }

    #[must_use]
    pub fn selector(&self) -> &str {
        match self {
            Self::Text(selector) | Self::Attribute { selector, .. } => selector,
        }
    }
}

/// Per-site extraction rules
///
/// Every field lists candidates in priority order; the first one producing a
/// non-empty value wins. Block markers are checked against the whole page
/// before any card is touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorStrategy {
    /// Result-card container; also the selector the driver waits for
    pub card: String,
    pub title: Vec<Candidate>,
    pub price: Vec<Candidate>,
    pub rating: Vec<Candidate>,
    /// Detail-page link (normally an `href` attribute)
    pub link: Vec<Candidate>,
    /// Product image (normally a `src` attribute)
    pub image: Vec<Candidate>,
    #[serde(default)]
    pub coupon: Vec<Candidate>,
    /// Case-insensitive phrases that only appear on block/captcha pages
    #[serde(default)]
    pub block_phrases: Vec<String>,
    /// Elements that only exist on block/captcha pages
    #[serde(default)]
    pub block_selectors: Vec<String>,
}

impl SelectorStrategy {
    /// Reject strategies that could never produce a listable record
    pub fn validate(&self) -> ScrapeResult<()> {
        if self.card.trim().is_empty() {
            return Err(ScrapeError::Profile("card selector cannot be empty".to_string()));
        }
        for (field, candidates) in [("title", &self.title), ("link", &self.link)] {
            if candidates.is_empty() {
                return Err(ScrapeError::Profile(format!(
                    "{field} needs at least one candidate selector"
                )));
            }
        }
        let every_candidate = self
            .title
            .iter()
            .chain(&self.price)
            .chain(&self.rating)
            .chain(&self.link)
            .chain(&self.image)
            .chain(&self.coupon);
        for candidate in every_candidate {
            if candidate.selector().trim().is_empty() {
                return Err(ScrapeError::Profile("empty candidate selector".to_string()));
            }
        }
        if self.block_phrases.iter().any(|phrase| phrase.trim().is_empty()) {
            return Err(ScrapeError::Profile("empty block phrase".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_deserialize_from_plain_and_attribute_forms() {
        let parsed: Vec<Candidate> = serde_json::from_value(serde_json::json!([
            "h2 span",
            { "selector": "h2 a", "attribute": "href" }
        ]))
        .unwrap();
        assert_eq!(
            parsed,
            vec![Candidate::text("h2 span"), Candidate::attribute("h2 a", "href")]
        );
    }
}
