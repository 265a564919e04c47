use price_scout::{BrowserSession, ChromiumFetcher, builtin_sites, search_sites};

#[tokio::test]
#[ignore] // Requires a Chromium installation and network access
async fn live_search_returns_capped_results() {
    let session = BrowserSession::launch(true).await.unwrap();
    let mut fetcher = ChromiumFetcher::new(&session).await.unwrap();

    let sites = builtin_sites();
    let report = search_sites(&mut fetcher, "MARTILLO", &sites, 3).await;

    session.shutdown().await.unwrap();

    assert_eq!(report.outcomes.len(), sites.len());
    assert!(report.hits().len() <= 3 * sites.len());
    for hit in report.hits() {
        assert!(hit.link.starts_with("http"));
    }
}
