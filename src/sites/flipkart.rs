//! flipkart.com search results
//!
//! Flipkart ships obfuscated class names that change every few months, so
//! most fields carry one candidate per known markup generation.

use super::{Candidate, SelectorStrategy, SiteProfile};
use crate::result::Platform;

pub(super) fn profile() -> SiteProfile {
    SiteProfile {
        platform: Platform::Flipkart,
        base_url: "https://www.flipkart.com".to_string(),
        search_path: "/search".to_string(),
        query_param: "q".to_string(),
        strategy: SelectorStrategy {
            card: "div[data-id]".to_string(),
            title: vec![
                Candidate::text("a.s1Q9rs"),
                Candidate::text("div.KzDlHZ"),
                Candidate::text("a.IRpwTa"),
            ],
            price: vec![Candidate::text("div.Nx9bqj")],
            rating: vec![Candidate::text("div.XQDdHH")],
            link: vec![
                Candidate::attribute("a.CGtC98", "href"),
                Candidate::attribute("a._1fQZEK", "href"),
                Candidate::attribute("a.s1Q9rs", "href"),
            ],
            image: vec![
                Candidate::attribute("img.DByuf4", "src"),
                Candidate::attribute("img", "src"),
            ],
            coupon: vec![
                Candidate::text("div.UkUFwK span"),
                Candidate::text("div._3Ay6Sb span"),
            ],
            block_phrases: vec![
                "Access Denied".to_string(),
                "blocked".to_string(),
                "captcha".to_string(),
                "unusual traffic".to_string(),
            ],
            block_selectors: Vec::new(),
        },
        // Login prompt shown to fresh sessions
        interstitial_dismiss: vec!["button._2KpZ6l._2doB4z".to_string()],
        blocked_message: "Flipkart blocked the request. No false data returned.".to_string(),
        unavailable_message: "No Flipkart product listings found for this query at this time."
            .to_string(),
    }
}
