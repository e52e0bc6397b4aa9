//! Robots-Warden main entry point
//!
//! Command-line front end that checks URLs against their hosts' robots.txt.

use clap::Parser;
use robots_warden::ComplianceEngine;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Robots-Warden: robots.txt compliance checks for crawlers
///
/// Fetches and caches each host's robots.txt, then reports whether every
/// given URL may be crawled and the delay required between requests.
#[derive(Parser, Debug)]
#[command(name = "robots-warden")]
#[command(version = "1.0.0")]
#[command(about = "Check URLs against robots.txt", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// URLs to check
    #[arg(value_name = "URL", required = true)]
    urls: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print the cached hosts after checking
    #[arg(long)]
    summary: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let engine = match ComplianceEngine::from_config_file(&cli.config) {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            tracing::error!("Failed to set up compliance engine: {}", e);
            return Err(e.into());
        }
    };

    let verdicts = check_urls(&engine, cli.urls).await?;
    for (url, allowed, delay_ms) in &verdicts {
        let label = if *allowed { "ALLOWED" } else { "DISALLOWED" };
        println!("{:<10}  {:>6}ms  {}", label, delay_ms, url);
    }

    if cli.summary {
        println!("\nCached hosts ({}):", engine.cache_size());
        for origin in engine.cache().origins() {
            println!("  - {}", origin);
        }
    }

    Ok(())
}

/// Checks all URLs concurrently, returning verdicts in input order
async fn check_urls(
    engine: &Arc<ComplianceEngine>,
    urls: Vec<String>,
) -> Result<Vec<(String, bool, u128)>, tokio::task::JoinError> {
    let mut workers = tokio::task::JoinSet::new();

    for (index, url) in urls.into_iter().enumerate() {
        let engine = Arc::clone(engine);
        workers.spawn(async move {
            let allowed = engine.is_url_allowed(&url).await;
            let delay = engine.crawl_delay(&url).await;
            (index, url, allowed, delay.as_millis())
        });
    }

    let mut verdicts = Vec::new();
    while let Some(result) = workers.join_next().await {
        verdicts.push(result?);
    }
    verdicts.sort_by_key(|(index, ..)| *index);

    Ok(verdicts
        .into_iter()
        .map(|(_, url, allowed, delay)| (url, allowed, delay))
        .collect())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("robots_warden=info,warn"),
            1 => EnvFilter::new("robots_warden=debug,info"),
            2 => EnvFilter::new("robots_warden=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}
