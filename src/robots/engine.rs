//! Compliance engine: the single gate between the crawler and a site's
//! robots.txt policy.
//!
//! The crawl-facing operations are total. Fetch failures turn into a
//! blocked policy and malformed URLs are disallowed, so `is_url_allowed` and
//! `crawl_delay` never return an error to the crawl scheduler. Only setup
//! and the explicit [`ComplianceEngine::policy_for`] lookup are fallible.

use crate::config::Config;
use crate::robots::{
    parse_robots, ComplianceCache, FetchOutcome, HttpPolicyFetcher, PolicyFetcher, RobotsPolicy,
    DEFAULT_CRAWL_DELAY_MS,
};
use crate::config::load_config;
use crate::url::parse_target;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Decides whether URLs may be crawled and at what pace
///
/// The engine is `Send + Sync` whenever its fetcher is, so one instance can
/// be wrapped in an `Arc` and shared by all crawl workers.
///
/// # Example
///
/// ```no_run
/// use robots_warden::ComplianceEngine;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = ComplianceEngine::from_config_file(Path::new("warden.toml"))?;
///
/// if engine.is_url_allowed("https://example.com/page").await {
///     let delay = engine.crawl_delay("https://example.com/page").await;
///     tokio::time::sleep(delay).await;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ComplianceEngine<F = HttpPolicyFetcher> {
    fetcher: F,
    cache: Arc<ComplianceCache>,
    default_delay_ms: u64,
}

impl ComplianceEngine<HttpPolicyFetcher> {
    /// Creates an engine that fetches robots.txt over HTTP
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let fetcher = HttpPolicyFetcher::new(config)?;
        Ok(Self::new(fetcher).with_default_delay(config.robots.default_crawl_delay))
    }

    /// Loads and validates a TOML configuration file, then builds the engine
    pub fn from_config_file(path: &Path) -> crate::Result<Self> {
        let config = load_config(path)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_config(&config)
    }
}

impl<F: PolicyFetcher> ComplianceEngine<F> {
    /// Creates an engine with its own empty cache
    pub fn new(fetcher: F) -> Self {
        Self::with_cache(fetcher, Arc::new(ComplianceCache::new()))
    }

    /// Creates an engine over an existing, possibly shared, cache
    pub fn with_cache(fetcher: F, cache: Arc<ComplianceCache>) -> Self {
        Self {
            fetcher,
            cache,
            default_delay_ms: DEFAULT_CRAWL_DELAY_MS,
        }
    }

    /// Sets the crawl delay used when a host states none (milliseconds)
    pub fn with_default_delay(mut self, default_delay_ms: u64) -> Self {
        self.default_delay_ms = default_delay_ms;
        self
    }

    /// Returns the cache backing this engine
    pub fn cache(&self) -> &Arc<ComplianceCache> {
        &self.cache
    }

    /// Checks whether a URL may be fetched
    ///
    /// # Returns
    ///
    /// * `true` - The host has no robots.txt, or its rules allow the path
    /// * `false` - The URL is malformed, the host's policy could not be
    ///   retrieved, or a longer disallow rule matches the path
    pub async fn is_url_allowed(&self, url: &str) -> bool {
        let target = match parse_target(url) {
            Ok(target) => target,
            Err(e) => {
                tracing::debug!("Disallowing malformed URL '{}': {}", url, e);
                return false;
            }
        };

        let policy = self.resolve(&target.origin).await;
        let allowed = policy.is_allowed(&target.path);

        if !allowed {
            tracing::debug!("URL {} disallowed by robots.txt", url);
        }

        allowed
    }

    /// Returns the minimum delay between requests to the URL's host
    ///
    /// Malformed URLs get the default delay.
    pub async fn crawl_delay(&self, url: &str) -> Duration {
        match parse_target(url) {
            Ok(target) => self.resolve(&target.origin).await.crawl_delay(),
            Err(e) => {
                tracing::debug!("Using default crawl delay for malformed URL '{}': {}", url, e);
                Duration::from_millis(self.default_delay_ms)
            }
        }
    }

    /// Returns the policy governing a URL's host
    ///
    /// Unlike [`is_url_allowed`](Self::is_url_allowed), a malformed URL is
    /// reported as an error instead of being treated as disallowed.
    pub async fn policy_for(&self, url: &str) -> crate::Result<Arc<RobotsPolicy>> {
        let target = parse_target(url)?;
        Ok(self.resolve(&target.origin).await)
    }

    /// Empties the cache; later lookups fetch robots.txt again
    ///
    /// Fetches already in flight still answer their callers, but their
    /// results are not stored.
    pub fn clear_cache(&self) {
        tracing::debug!("Clearing {} cached robots policies", self.cache.len());
        self.cache.clear();
    }

    /// Number of distinct hosts currently cached
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    /// Returns the cached policy for an origin, fetching it on a miss
    ///
    /// No lock is held while fetching, so concurrent misses for one origin
    /// may fetch twice; the cache keeps the first stored policy. A result
    /// fetched across a cache clear is returned but not stored.
    pub async fn resolve(&self, origin: &str) -> Arc<RobotsPolicy> {
        let generation = self.cache.generation();
        if let Some(policy) = self.cache.get(origin) {
            tracing::trace!("Using cached robots.txt for {}", origin);
            return policy;
        }

        tracing::debug!("No cached robots.txt for {}, fetching", origin);
        let outcome = self.fetcher.fetch(origin).await;
        let policy = build_policy(origin, outcome, self.default_delay_ms);

        self.cache.insert_at(origin, policy, generation)
    }
}

/// Turns a fetch outcome into the policy stored for the origin
///
/// | Outcome | Policy |
/// |---------|--------|
/// | Ok(body) | parsed from the body |
/// | NotFound | unrestricted |
/// | Forbidden | blocked |
/// | ServerError | blocked |
/// | NetworkError | blocked |
fn build_policy(origin: &str, outcome: FetchOutcome, default_delay_ms: u64) -> RobotsPolicy {
    match outcome {
        FetchOutcome::Ok(body) => {
            let policy = parse_robots(&body, default_delay_ms);
            tracing::debug!(
                "Parsed robots.txt for {}: {} allow, {} disallow, {}ms delay",
                origin,
                policy.allow_rules().len(),
                policy.disallow_rules().len(),
                policy.crawl_delay_millis()
            );
            policy
        }
        FetchOutcome::NotFound { status_code } => {
            tracing::info!(
                "No robots.txt for {} (HTTP {}), allowing all paths",
                origin,
                status_code
            );
            RobotsPolicy::unrestricted(default_delay_ms)
        }
        FetchOutcome::Forbidden { status_code } | FetchOutcome::ServerError { status_code } => {
            tracing::warn!(
                "robots.txt for {} unavailable (HTTP {}), blocking host",
                origin,
                status_code
            );
            RobotsPolicy::blocked(default_delay_ms)
        }
        FetchOutcome::NetworkError { error } => {
            tracing::warn!(
                "Could not fetch robots.txt for {} ({}), blocking host",
                origin,
                error
            );
            RobotsPolicy::blocked(default_delay_ms)
        }
    }
}
