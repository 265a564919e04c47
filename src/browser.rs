//! Browser session lifecycle.
//!
//! One [`BrowserSession`] lives for a whole run and is closed exactly once,
//! however many sites failed. The CDP event handler runs on a tracked tokio
//! task; it must be aborted once the browser is gone or it would outlive it.

use std::path::PathBuf;

use anyhow::Result;
use chromiumoxide::browser::Browser;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::browser_setup;

/// A launched browser plus its handler task and temp profile directory.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl BrowserSession {
    /// Launch a browser for this run.
    pub async fn launch(headless: bool) -> Result<Self> {
        let (browser, handler, user_data_dir) = browser_setup::launch_browser(headless).await?;
        Ok(Self {
            browser,
            handler,
            user_data_dir: Some(user_data_dir),
        })
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Close the browser process and remove its temp profile.
    ///
    /// Close must complete before the profile directory is removed: Chrome
    /// holds file locks until the process exits.
    pub async fn shutdown(mut self) -> Result<()> {
        info!("Shutting down browser session");

        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser cleanly: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser exit: {e}");
        }
        self.cleanup_profile_dir();

        // Drop aborts the handler task.
        Ok(())
    }

    fn cleanup_profile_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take()
            && let Err(e) = std::fs::remove_dir_all(&path)
        {
            warn!(
                "Failed to remove temp profile {}: {e}. Manual cleanup may be required.",
                path.display()
            );
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
        // Fallback for paths that never reached shutdown(); Browser::drop
        // kills the Chrome process itself.
        if self.user_data_dir.is_some() {
            warn!("Browser session dropped without shutdown, removing temp profile in Drop");
            self.cleanup_profile_dir();
        }
    }
}
