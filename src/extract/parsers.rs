//! Field parsers for raw card text
//!
//! Pure functions turning captured strings into typed values. None of these
//! panic; malformed input yields `None`.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// First integer-or-decimal token, e.g. `123456.50` in `₹1,23,456.50`
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    // ASCII digits only; other numeral systems would not parse as u64/f64 anyway
    Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("NUMBER_RE: hardcoded regex is valid")
});

fn first_number(raw: &str) -> Option<&str> {
    NUMBER_RE.find(raw).map(|m| m.as_str())
}

/// Parse a displayed price into whole currency units
///
/// Thousands separators are stripped before matching so both western
/// (`1,234,567`) and Indian (`12,34,567`) groupings read as one number. The
/// fractional part is floored away.
///
/// # Example
/// ```
/// use kodegen_tools_pricescout::extract::parse_price;
///
/// assert_eq!(parse_price("₹1,23,456.50"), Some(123456));
/// assert_eq!(parse_price("no digits"), None);
/// ```
#[must_use]
pub fn parse_price(raw: &str) -> Option<u64> {
    if raw.is_empty() {
        return None;
    }
    let cleaned = raw.replace(',', "");
    let token = first_number(&cleaned)?;
    let whole = token.split('.').next().unwrap_or(token);
    whole.parse::<u64>().ok()
}

/// Parse a star rating such as `4.3 out of 5 stars`
#[must_use]
pub fn parse_rating(raw: &str) -> Option<f64> {
    first_number(raw)?.parse::<f64>().ok()
}

/// Resolve `href` against `base`
///
/// Returns `None` for a blank `href`, an unparseable `base`, or a reference
/// that cannot be joined.
#[must_use]
pub fn absolute_url(href: &str, base: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let base = Url::parse(base).ok()?;
    base.join(href).ok().map(String::from)
}
