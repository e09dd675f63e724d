//! Field parsing and per-card extraction

mod card;
mod parsers;

pub use card::extract_card;
pub use parsers::{absolute_url, parse_price, parse_rating};
