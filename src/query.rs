//! Validated search query

use std::fmt;

use crate::error::{ScrapeError, ScrapeResult};

/// A trimmed, non-empty product search term
///
/// Construction is the only place validation happens; once a `SearchQuery`
/// exists it is always safe to encode into a site URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Trim and validate a raw query
    ///
    /// Any non-blank text is a valid search term, whatever its length or script.
    ///
    /// # Errors
    /// `EmptyQuery` for blank input.
    pub fn parse(raw: &str) -> ScrapeResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ScrapeError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded form for a query-string value
    ///
    /// Everything outside `A-Z a-z 0-9 - _ . ~` is escaped, so `!'()*` are
    /// encoded too (`encodeURIComponent` leaves those alone). Both forms decode
    /// to the same term.
    #[must_use]
    pub fn encoded(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SearchQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
