//! Data structures and constants for the site search runner.

use serde::{Deserialize, Serialize};

use crate::error::SiteError;

/// Default number of product cards kept per site.
pub const DEFAULT_MAX_PER_SITE: usize = 3;

/// Sentinel price for cards without a readable price element.
pub const PRICE_FALLBACK: &str = "N/A";

/// One extracted product card.
///
/// Field order is the output contract: `source`, `title`, `price`, `link`.
/// `link` is always absolute after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductHit {
    /// Name of the site the card came from; matches exactly one
    /// [`SiteConfig`](crate::sites::SiteConfig) name.
    pub source: String,
    /// Card title text.
    pub title: String,
    /// Card price text, or [`PRICE_FALLBACK`] when absent.
    pub price: String,
    /// Absolute product URL.
    pub link: String,
}

/// What happened on one site.
#[derive(Debug)]
pub enum SiteStatus {
    /// The site rendered and was extracted; possibly with zero matches.
    Found(Vec<ProductHit>),
    /// The site was abandoned with a typed reason.
    Skipped(SiteError),
}

/// Per-site outcome: diagnostics and returned data both derive from this one
/// value, so there is no silent failure path.
#[derive(Debug)]
pub struct SiteOutcome {
    pub site: String,
    pub status: SiteStatus,
}

/// Result of a whole run, in site order.
#[derive(Debug)]
pub struct RunReport {
    pub query: String,
    pub outcomes: Vec<SiteOutcome>,
}

impl RunReport {
    /// All hits flattened in output order: grouped by site, card order within
    /// a site, site order as configured.
    #[must_use]
    pub fn hits(&self) -> Vec<&ProductHit> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.status {
                SiteStatus::Found(hits) => Some(hits.iter()),
                SiteStatus::Skipped(_) => None,
            })
            .flatten()
            .collect()
    }

    /// True when every configured site was skipped with an error.
    ///
    /// Distinct from a run that searched sites but matched nothing.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty()
            && self
                .outcomes
                .iter()
                .all(|o| matches!(o.status, SiteStatus::Skipped(_)))
    }
}
