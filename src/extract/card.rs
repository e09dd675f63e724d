//! Card extractor
//!
//! Turns one result card into one `ProductRecord`. A lookup that fails for
//! any reason (missing element, missing attribute, detached node, CDP error)
//! only costs the field it was for.

use tracing::trace;

use super::parsers::{absolute_url, parse_price, parse_rating};
use crate::driver::CardHandle;
use crate::result::ProductRecord;
use crate::sites::{Candidate, SiteProfile};
use crate::utils::UNAVAILABLE;

/// Read one candidate, folding errors and blank values into `None`
async fn read_candidate(card: &dyn CardHandle, candidate: &Candidate) -> Option<String> {
    let result = match candidate {
        Candidate::Text(selector) => card.first_text(selector).await,
        Candidate::Attribute {
            selector,
            attribute,
        } => card.first_attribute(selector, attribute).await,
    };
    match result {
        Ok(Some(value)) => {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Ok(None) => None,
        Err(e) => {
            trace!("Lookup '{}' failed: {:#}", candidate.selector(), e);
            None
        }
    }
}

/// First non-empty value among `candidates`, in priority order
async fn first_value(card: &dyn CardHandle, candidates: &[Candidate]) -> Option<String> {
    for candidate in candidates {
        if let Some(value) = read_candidate(card, candidate).await {
            return Some(value);
        }
    }
    None
}

/// Extract one product record from a card
///
/// Never fails: absent text fields become `"Unavailable"`, absent numeric
/// and URL fields become `None`. Link and image values are resolved against
/// the profile's `base_url`.
pub async fn extract_card(card: &dyn CardHandle, profile: &SiteProfile) -> ProductRecord {
    let strategy = &profile.strategy;

    let title = first_value(card, &strategy.title).await;
    let raw_price = first_value(card, &strategy.price).await;
    let raw_rating = first_value(card, &strategy.rating).await;
    let href = first_value(card, &strategy.link).await;
    let image = first_value(card, &strategy.image).await;
    let coupon = first_value(card, &strategy.coupon).await;

    ProductRecord {
        platform: profile.platform,
        title: title.unwrap_or_else(|| UNAVAILABLE.to_string()),
        price: raw_price.as_deref().and_then(parse_price),
        rating: raw_rating.as_deref().and_then(parse_rating),
        url: href
            .as_deref()
            .and_then(|href| absolute_url(href, &profile.base_url)),
        image: image
            .as_deref()
            .and_then(|src| absolute_url(src, &profile.base_url)),
        coupon: coupon.unwrap_or_else(|| UNAVAILABLE.to_string()),
    }
}
