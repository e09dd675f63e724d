//! Page enhancement for retail sites
//!
//! Makes a freshly opened chromiumoxide page look like an ordinary desktop
//! browser in the configured locale before it is pointed at a search page.

use anyhow::Result;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, Headers, SetExtraHttpHeadersParams, SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::Page;

use super::SessionSettings;

/// Navigator patches evaluated on every new document
const NAVIGATOR_PATCH_JS: &str = r"
    Object.defineProperty(navigator, 'webdriver', { get: () => false });
    if (!window.chrome) { window.chrome = {}; }
    if (!window.chrome.runtime) {
        window.chrome.runtime = {
            connect: () => ({
                onMessage: { addListener: () => {}, removeListener: () => {} },
                postMessage: () => {}
            })
        };
    }
";

/// Apply identity, viewport, no-cache headers, navigator patches and a
/// resource timing buffer large enough for network-idle tracking
pub async fn enhance_page(page: &Page, settings: &SessionSettings) -> Result<()> {
    page.execute(EnableParams::default()).await?;

    page.set_user_agent(
        SetUserAgentOverrideParams::builder()
            .user_agent(settings.user_agent.clone())
            .accept_language(settings.accept_language.clone())
            .platform("Win32")
            .build()
            .map_err(anyhow::Error::msg)?,
    )
    .await?;

    page.execute(
        SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(settings.viewport_width))
            .height(i64::from(settings.viewport_height))
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(anyhow::Error::msg)?,
    )
    .await?;

    // Stale CDN copies of a results page are worse than a slow fresh one
    page.execute(SetExtraHttpHeadersParams::new(Headers::new(serde_json::json!({
        "Accept-Language": settings.accept_language,
        "Cache-Control": "no-cache",
        "Pragma": "no-cache",
    }))))
    .await?;

    // Navigator patches are cosmetic; a failure here must not cost the scrape
    let languages = serde_json::to_string(&[settings.locale.as_str(), "en"])?;
    let language_patch = format!(
        "Object.defineProperty(navigator, 'languages', {{ get: () => {languages} }});"
    );
    let timing_buffer = format!(
        "performance.setResourceTimingBufferSize({});",
        super::chromium::RESOURCE_TIMING_BUFFER_SIZE
    );
    for source in [NAVIGATOR_PATCH_JS.to_string(), language_patch, timing_buffer] {
        let params = AddScriptToEvaluateOnNewDocumentParams {
            source,
            include_command_line_api: None,
            world_name: None,
            run_immediately: None,
        };
        if let Err(e) = page.execute(params).await {
            log::warn!("Failed to register navigator patch: {e}");
        }
    }

    log::debug!(
        "Page enhanced: {}x{} {}",
        settings.viewport_width,
        settings.viewport_height,
        settings.locale
    );
    Ok(())
}
