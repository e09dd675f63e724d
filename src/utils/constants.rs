//! Shared configuration constants for pricescout
//!
//! Default values used by `ScrapeConfig` and the listing pipeline.

/// Hard upper bound on products returned from one results page
pub const MAX_PRODUCTS: usize = 20;

/// Placeholder stored in text fields that could not be extracted
pub const UNAVAILABLE: &str = "Unavailable";

/// Default budget for starting a browser and connecting to it (ms)
pub const DEFAULT_LAUNCH_TIMEOUT_MS: u64 = 30_000;

/// Default timeout for navigation up to DOM parse (ms)
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 60_000;

/// Floor for chromiumoxide's per-command CDP timeout (ms)
///
/// Raised to the navigation timeout when that is longer, since `Page.navigate`
/// is itself one command.
pub const MIN_CDP_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Pause after DOM parse so client-side rendering can catch up (ms)
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1_500;

/// Best-effort network quiescence budget (ms)
///
/// Retail sites keep analytics and ad sockets open indefinitely, so this wait
/// regularly runs out. Running out is not an error.
pub const DEFAULT_NETWORK_IDLE_TIMEOUT_MS: u64 = 15_000;

/// Window without new resource entries that counts as "quiet" (ms)
pub const DEFAULT_NETWORK_QUIET_WINDOW_MS: u64 = 500;

/// Mandatory wait for the results container (ms)
pub const DEFAULT_RESULTS_TIMEOUT_MS: u64 = 30_000;

/// Poll interval while waiting for the results container (ms)
pub const DEFAULT_RESULTS_POLL_INTERVAL_MS: u64 = 100;

/// Scroll-and-pause cycles used to hydrate lazily loaded cards
pub const DEFAULT_SCROLL_CYCLES: u32 = 3;

/// Vertical distance of one hydration scroll (px)
pub const DEFAULT_SCROLL_DISTANCE_PX: i64 = 1_800;

/// Pause after each hydration scroll (ms)
pub const DEFAULT_SCROLL_PAUSE_MS: u64 = 700;

/// Budget for clicking an interstitial close button (ms)
pub const DEFAULT_INTERSTITIAL_CLICK_TIMEOUT_MS: u64 = 3_000;

/// Pause after an interstitial was dismissed (ms)
pub const DEFAULT_INTERSTITIAL_PAUSE_MS: u64 = 500;

/// Concurrent browser sessions allowed by `PriceScout`
pub const DEFAULT_MAX_CONCURRENT_SESSIONS: usize = 2;

/// Locale and region presented to retail sites
pub const DEFAULT_LOCALE: &str = "en-IN";

/// Accept-Language header matching `DEFAULT_LOCALE`
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-IN,en;q=0.9";

/// Desktop viewport width (px)
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1_366;

/// Desktop viewport height (px)
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 900;

/// Desktop Chrome on Windows, in the reduced format Chrome itself sends
/// (only the major version is real; minor, build and patch are zero)
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
