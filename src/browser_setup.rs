use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tracing::{error, info, trace, warn};

use crate::driver::SessionSettings;
use crate::utils::MIN_CDP_REQUEST_TIMEOUT_MS;

/// Find Chrome/Chromium executable on the system with platform-specific search paths.
pub async fn find_browser_executable() -> Result<PathBuf> {
    // First check environment variable which overrides all other methods
    if let Ok(path) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!(
                "Using browser from CHROMIUM_PATH environment variable: {}",
                path.display()
            );
            return Ok(path);
        }
        warn!(
            "CHROMIUM_PATH environment variable points to non-existent file: {}",
            path.display()
        );
    }

    let paths: &[&str] = if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files\Chromium\Application\chrome.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "~/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/usr/local/bin/chromium",
            "/opt/google/chrome/chrome",
        ]
    };

    for path_str in paths {
        let path = match path_str.strip_prefix("~/") {
            Some(rest) => match dirs::home_dir() {
                Some(home) => home.join(rest),
                None => continue,
            },
            None => PathBuf::from(path_str),
        };

        if path.exists() {
            info!("Found browser at: {}", path.display());
            return Ok(path);
        }
    }

    // Use 'which' command to find Chromium on Unix systems
    if !cfg!(target_os = "windows") {
        for cmd in &["chromium", "chromium-browser", "google-chrome", "chrome"] {
            let output = Command::new("which").arg(cmd).output();

            if let Ok(output) = output
                && output.status.success()
            {
                let path_str = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path_str.is_empty() {
                    let path = PathBuf::from(path_str);
                    info!("Found browser using 'which' command: {}", path.display());
                    return Ok(path);
                }
            }
        }
    }

    warn!("No Chrome/Chromium executable found. Will download and use fetcher.");
    Err(anyhow::anyhow!("Chrome/Chromium executable not found"))
}

/// Downloads and manages Chromium browser if not found locally.
/// Returns a path to the downloaded executable.
pub async fn download_managed_browser() -> Result<PathBuf> {
    info!("Downloading managed Chromium browser...");

    let cache_dir = dirs::cache_dir()
        .map(|dir| dir.join("kodegen").join("pricescout"))
        .unwrap_or_else(|| {
            let fallback = std::env::temp_dir().join("kodegen_pricescout_cache");
            warn!(
                "Could not determine user cache directory, using temp directory fallback: {}",
                fallback.display()
            );
            fallback
        })
        .join("chromium");

    std::fs::create_dir_all(&cache_dir).context("Failed to create cache directory")?;

    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .context("Failed to build fetcher options")?,
    );

    let revision_info = fetcher.fetch().await.context("Failed to fetch browser")?;

    info!(
        "Downloaded Chromium to: {}",
        revision_info.folder_path.display()
    );

    Ok(revision_info.executable_path)
}

/// Locate a local browser, downloading a managed one as the last resort
pub async fn resolve_browser_executable() -> Result<PathBuf> {
    match find_browser_executable().await {
        Ok(path) => Ok(path),
        Err(_) => download_managed_browser().await,
    }
}

/// Throwaway Chrome profile directory, removed on drop unless kept
///
/// Dropping the launch future (e.g. when the launch budget runs out) drops
/// this guard too, so an abandoned launch leaves no directory behind.
#[derive(Debug)]
pub struct ProfileDir {
    path: PathBuf,
    remove_on_drop: bool,
}

impl ProfileDir {
    /// Create `<root>/pricescout_chrome_<uuid>`
    pub fn create(root: &Path) -> Result<Self> {
        let path = root.join(format!("pricescout_chrome_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&path).context("Failed to create user data directory")?;
        Ok(Self {
            path,
            remove_on_drop: true,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hand ownership of the directory to the caller
    #[must_use]
    pub fn keep(mut self) -> PathBuf {
        self.remove_on_drop = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for ProfileDir {
    fn drop(&mut self) {
        if !self.remove_on_drop {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            warn!("Failed to remove profile directory {}: {}", self.path.display(), e);
        }
    }
}

/// Per-command CDP timeout for a session
///
/// chromiumoxide bounds `Page.navigate` by this value, so it is never shorter
/// than the navigation budget.
#[must_use]
pub fn cdp_request_timeout(settings: &SessionSettings) -> Duration {
    settings
        .navigation_timeout
        .max(Duration::from_millis(MIN_CDP_REQUEST_TIMEOUT_MS))
}

/// Launch one isolated browser for a single scrape call
///
/// Every launch gets its own throwaway profile directory so concurrent scrapes
/// never share cookies, cache or locks. The returned `JoinHandle` drives the
/// CDP event stream and MUST be aborted once the browser is closed.
pub async fn launch_browser(
    executable: &Path,
    settings: &SessionSettings,
) -> Result<(Browser, JoinHandle<()>, PathBuf)> {
    let profile_root = settings
        .profile_root
        .clone()
        .unwrap_or_else(std::env::temp_dir);
    let profile = ProfileDir::create(&profile_root)?;

    let mut config_builder = BrowserConfigBuilder::default()
        .request_timeout(cdp_request_timeout(settings))
        .window_size(settings.viewport_width, settings.viewport_height)
        .user_data_dir(profile.path().to_path_buf())
        .chrome_executable(executable.to_path_buf());

    if settings.headless {
        config_builder = config_builder.headless_mode(HeadlessMode::default());
    } else {
        config_builder = config_builder.with_head();
    }

    config_builder = config_builder
        .arg(format!("--user-agent={}", settings.user_agent))
        .arg(format!("--lang={}", settings.locale))
        .arg("--disable-blink-features=AutomationControlled")
        .arg("--disable-infobars")
        .arg("--disable-notifications")
        .arg("--disable-setuid-sandbox")
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--no-sandbox")
        .arg("--disable-extensions")
        .arg("--disable-popup-blocking")
        .arg("--disable-background-timer-throttling")
        .arg("--disable-backgrounding-occluded-windows")
        .arg("--disable-breakpad")
        .arg("--disable-features=TranslateUI")
        .arg("--disable-hang-monitor")
        .arg("--disable-ipc-flooding-protection")
        .arg("--password-store=basic")
        .arg("--use-mock-keychain")
        .arg("--hide-scrollbars")
        .arg("--mute-audio");

    let browser_config = config_builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;

    info!("Launching browser with profile {}", profile.path().display());
    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .context("Failed to launch browser")?;
    let user_data_dir = profile.keep();

    let handler_task = task::spawn(async move {
        while let Some(h) = handler.next().await {
            if let Err(e) = h {
                let error_msg = e.to_string();

                // Chrome emits CDP events chromiumoxide cannot deserialize
                // Reference: https://github.com/mattsse/chromiumoxide/issues/167
                let is_benign_serialization_error = error_msg
                    .contains("data did not match any variant of untagged enum Message")
                    || error_msg.contains("Failed to deserialize WS response");

                if is_benign_serialization_error {
                    trace!("Suppressed benign CDP serialization error: {}", error_msg);
                } else {
                    error!("Browser handler error: {:?}", e);
                }
            }
        }
        trace!("Browser handler task completed");
    });

    Ok((browser, handler_task, user_data_dir))
}
