//! Process-wide browser automation state
//!
//! The browser executable is resolved once per process. Resolution may fail
//! (no Chrome installed, download blocked); that is recorded as
//! `Automation::Unavailable` and every later call gets a typed error instead
//! of retrying the discovery.

use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::driver::{BrowserLauncher, ChromiumLauncher};
use crate::error::{ScrapeError, ScrapeResult};

/// Outcome of the one-time automation startup
#[derive(Clone)]
pub enum Automation {
    Ready(Arc<dyn BrowserLauncher>),
    Unavailable { reason: String },
}

impl Automation {
    /// The launcher, or `AutomationUnavailable`
    pub fn launcher(&self) -> ScrapeResult<Arc<dyn BrowserLauncher>> {
        match self {
            Self::Ready(launcher) => Ok(Arc::clone(launcher)),
            Self::Unavailable { reason } => Err(ScrapeError::AutomationUnavailable(reason.clone())),
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

impl std::fmt::Debug for Automation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(_) => f.write_str("Automation::Ready"),
            Self::Unavailable { reason } => f
                .debug_struct("Automation::Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

static AUTOMATION: OnceCell<Automation> = OnceCell::const_new();

/// Resolve the browser once for this process
///
/// Concurrent callers wait for the same attempt; later calls return the
/// recorded outcome.
pub async fn init_automation() -> &'static Automation {
    AUTOMATION
        .get_or_init(|| async {
            match ChromiumLauncher::discover().await {
                Ok(launcher) => {
                    info!("Browser automation ready: {}", launcher.executable().display());
                    Automation::Ready(Arc::new(launcher))
                }
                Err(e) => {
                    error!("Browser automation unavailable: {:#}", e);
                    Automation::Unavailable {
                        reason: format!("{e:#}"),
                    }
                }
            }
        })
        .await
}

/// Launcher recorded by `init_automation`
///
/// # Errors
/// `AutomationUnavailable` when startup failed or has not run yet.
pub fn automation() -> ScrapeResult<Arc<dyn BrowserLauncher>> {
    match AUTOMATION.get() {
        Some(state) => state.launcher(),
        None => Err(ScrapeError::AutomationUnavailable(
            "automation was not initialised".to_string(),
        )),
    }
}
