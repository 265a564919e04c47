//! The page fetcher seam.
//!
//! [`PageFetcher`] is the one operation the runner needs from a browser:
//! navigate to a URL, wait for the card selector to render, hand back the
//! page HTML. The production implementation drives a chromiumoxide [`Page`];
//! tests substitute a deterministic stub.

use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use chromiumoxide::page::Page;
use tracing::debug;

use crate::browser::BrowserSession;
use crate::error::SiteError;

/// Maximum wait for a navigation to reach a parsed-DOM state.
pub const NAVIGATION_TIMEOUT_SECS: u64 = 15;

/// Maximum wait for the card selector to appear after navigation.
pub const SELECTOR_WAIT_TIMEOUT_SECS: u64 = 5;

const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Fetch the rendered content of a search results page.
#[async_trait]
pub trait PageFetcher {
    /// Navigate to `url`, wait until at least one element matches
    /// `card_selector`, and return the rendered HTML.
    async fn fetch_rendered(&mut self, url: &str, card_selector: &str)
    -> Result<String, SiteError>;
}

/// Production fetcher: one chromiumoxide page, reused across all sites in a
/// run.
pub struct ChromiumFetcher {
    page: Page,
}

impl ChromiumFetcher {
    /// Open the single page this fetcher will navigate for the whole run.
    pub async fn new(session: &BrowserSession) -> anyhow::Result<Self> {
        let page = session
            .browser()
            .new_page("about:blank")
            .await
            .context("Failed to open a browser page")?;
        Ok(Self { page })
    }
}

#[async_trait]
impl PageFetcher for ChromiumFetcher {
    async fn fetch_rendered(
        &mut self,
        url: &str,
        card_selector: &str,
    ) -> Result<String, SiteError> {
        // Navigation proceeds once the DOM is parsed; rendered results are
        // what the selector poll below waits for.
        let navigation = async {
            self.page.goto(url).await.context("Failed to navigate")?;
            self.page
                .wait_for_navigation()
                .await
                .context("Failed to wait for page load")?;
            Ok::<(), anyhow::Error>(())
        };

        match tokio::time::timeout(Duration::from_secs(NAVIGATION_TIMEOUT_SECS), navigation).await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(SiteError::Browser(e)),
            Err(_) => {
                return Err(SiteError::NavigationTimeout {
                    secs: NAVIGATION_TIMEOUT_SECS,
                });
            }
        }

        // Sites render cards client-side after the document loads, so poll
        // the DOM instead of trusting the navigation event.
        let start = Instant::now();
        let max_wait = Duration::from_secs(SELECTOR_WAIT_TIMEOUT_SECS);
        loop {
            if self.page.find_element(card_selector).await.is_ok() {
                debug!(
                    "Cards appeared after {:.2}s",
                    start.elapsed().as_secs_f64()
                );
                break;
            }
            if start.elapsed() >= max_wait {
                return Err(SiteError::ResultsTimeout {
                    selector: card_selector.to_string(),
                    secs: SELECTOR_WAIT_TIMEOUT_SECS,
                });
            }
            tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
        }

        self.page
            .content()
            .await
            .context("Failed to capture page content")
            .map_err(SiteError::Browser)
    }
}
