// price-scout: search a fixed set of e-commerce sites for a product query
// with a headless browser and print the top matches as JSON.
//
// Results go to stdout, diagnostics to stderr.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

use price_scout::{
    BrowserSession, ChromiumFetcher, DEFAULT_MAX_PER_SITE, RunReport, SiteConfig, builtin_sites,
    search_sites,
};

#[derive(Debug, Parser)]
#[command(
    name = "price-scout",
    version,
    about = "Search Peruvian e-commerce sites for product listings"
)]
struct Cli {
    /// Product to search for
    #[arg(value_name = "QUERY", default_value = "MARTILLO")]
    query: String,

    /// Maximum number of product cards kept per site
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_PER_SITE)]
    max_per_site: usize,

    /// Restrict the run to the named sites (repeatable)
    #[arg(long, value_name = "NAME")]
    site: Vec<String>,

    /// Run the browser with a visible window
    #[arg(long, default_value_t = false)]
    headed: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let sites = match select_sites(&cli.site) {
        Ok(sites) => sites,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(2);
        }
    };

    let report = match run(&cli, &sites).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&report.hits()) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("error: failed to serialize results: {e}");
            return ExitCode::FAILURE;
        }
    }

    if report.all_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn run(cli: &Cli, sites: &[SiteConfig]) -> Result<RunReport> {
    let session = BrowserSession::launch(!cli.headed)
        .await
        .context("Failed to launch browser")?;

    let result = match ChromiumFetcher::new(&session).await {
        Ok(mut fetcher) => Ok(search_sites(&mut fetcher, &cli.query, sites, cli.max_per_site).await),
        Err(e) => Err(e),
    };

    // The session closes exactly once, on success and on failure alike.
    if let Err(e) = session.shutdown().await {
        warn!("Browser shutdown reported an error: {e:#}");
    }

    result
}

fn select_sites(names: &[String]) -> Result<Vec<SiteConfig>> {
    let all = builtin_sites();
    if names.is_empty() {
        return Ok(all);
    }

    let mut picked: Vec<SiteConfig> = Vec::new();
    for name in names {
        let Some(site) = all.iter().find(|s| s.name.eq_ignore_ascii_case(name)) else {
            anyhow::bail!(
                "unknown site {:?} (known sites: {})",
                name,
                all.iter()
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        };
        if !picked.iter().any(|p| p.name == site.name) {
            picked.push(site.clone());
        }
    }
    Ok(picked)
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // chromiumoxide's handler/conn targets are far too chatty for a CLI.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        .add_directive("chromiumoxide::handler=off".parse().unwrap())
        .add_directive("chromiumoxide::conn=off".parse().unwrap());

    // stdout carries the JSON contract; everything else belongs on stderr.
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
