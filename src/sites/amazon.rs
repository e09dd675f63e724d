//! amazon.in search results

use super::{Candidate, SelectorStrategy, SiteProfile};
use crate::result::Platform;

pub(super) fn profile() -> SiteProfile {
    SiteProfile {
        platform: Platform::Amazon,
        base_url: "https://www.amazon.in".to_string(),
        search_path: "/s".to_string(),
        query_param: "k".to_string(),
        strategy: SelectorStrategy {
            card: r#"div.s-result-item[data-component-type="s-search-result"]"#.to_string(),
            title: vec![Candidate::text("h2 span")],
            // .a-offscreen holds the full formatted price; .a-price-whole drops paise
            price: vec![
                Candidate::text(".a-price .a-offscreen"),
                Candidate::text(".a-price-whole"),
            ],
            rating: vec![Candidate::text(".a-icon-alt")],
            link: vec![Candidate::attribute("h2 a", "href")],
            image: vec![Candidate::attribute("img", "src")],
            coupon: vec![
                Candidate::text("span.s-coupon-unclipped"),
                Candidate::text("span.s-coupon-clipped"),
                Candidate::text(r#"[data-cy="coupon"]"#),
            ],
            block_phrases: vec![
                "Enter the characters you see below".to_string(),
                "Type the characters you see in this image".to_string(),
                "Robot Check".to_string(),
            ],
            block_selectors: vec![r#"form[action*="validateCaptcha"]"#.to_string()],
        },
        interstitial_dismiss: Vec::new(),
        blocked_message: "Amazon blocked the request (captcha/robot check). No false data returned."
            .to_string(),
        unavailable_message: "No Amazon product listings found for this query at this time."
            .to_string(),
    }
}
