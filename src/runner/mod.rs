//! Site search runner.
//!
//! Walks the site table strictly sequentially: build the navigation URL,
//! fetch the rendered page, extract cards, record the outcome. A failure on
//! one site is contained there — it is logged, captured in the report, and
//! the loop moves on. The runner itself never fails.

pub mod extract;
pub mod types;

pub use types::{DEFAULT_MAX_PER_SITE, ProductHit, RunReport, SiteOutcome, SiteStatus};

use tracing::{info, warn};

use crate::fetcher::PageFetcher;
use crate::sites::SiteConfig;

/// Search every site in order and collect the per-site outcomes.
///
/// Output ordering is deterministic for a deterministic fetcher: hits are
/// grouped by site in table order, in document order within a site, capped
/// at `max_per_site` per site. Exactly one attempt per site, no retries.
pub async fn search_sites<F>(
    fetcher: &mut F,
    query: &str,
    sites: &[SiteConfig],
    max_per_site: usize,
) -> RunReport
where
    F: PageFetcher,
{
    let mut outcomes = Vec::with_capacity(sites.len());

    for site in sites {
        let nav_url = site.navigation_url(query);
        info!("Searching {}...", site.name);

        let status = match fetcher.fetch_rendered(&nav_url, &site.card_selector).await {
            Ok(html) => match extract::extract_cards(&html, site, &nav_url, max_per_site) {
                Ok(hits) => {
                    info!("{}: {} result(s)", site.name, hits.len());
                    SiteStatus::Found(hits)
                }
                Err(err) => {
                    warn!("{}: {}", site.name, err);
                    SiteStatus::Skipped(err)
                }
            },
            Err(err) => {
                warn!("{}: {}", site.name, err);
                SiteStatus::Skipped(err)
            }
        };

        outcomes.push(SiteOutcome {
            site: site.name.clone(),
            status,
        });
    }

    RunReport {
        query: query.to_string(),
        outcomes,
    }
}
