//! Per-site error taxonomy.
//!
//! Every failure during one site's search is contained at the site boundary:
//! the runner records it as a [`SiteError`] inside the run report and moves
//! on to the next site. Nothing here aborts a run.

use thiserror::Error;

/// Reason a site contributed zero results to a run.
#[derive(Debug, Error)]
pub enum SiteError {
    /// The page never reached a parsed-DOM state within the navigation timeout.
    #[error("page did not finish loading within {secs}s")]
    NavigationTimeout { secs: u64 },

    /// The card selector never matched within the selector-wait timeout.
    ///
    /// An empty result set and changed site markup are indistinguishable at
    /// this point; the message says so rather than guessing.
    #[error("no element matched {selector:?} within {secs}s (empty results, or the site markup changed)")]
    ResultsTimeout { selector: String, secs: u64 },

    /// A selector string in the site table failed to parse.
    #[error("invalid CSS selector {selector:?} in site configuration")]
    InvalidSelector { selector: String },

    /// Anything else the browser session reported: navigation refused, DNS
    /// failure, page or target lost mid-flight.
    #[error("browser error: {0:#}")]
    Browser(anyhow::Error),
}
