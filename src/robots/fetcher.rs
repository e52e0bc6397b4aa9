//! robots.txt fetcher implementation
//!
//! This module retrieves `/robots.txt` for an origin and classifies the
//! response:
//! - Building HTTP clients with a proper user agent string and bounded timeout
//! - Mapping status codes to a closed set of outcomes
//! - Reading the body permissively (lossy UTF-8, size-capped)

use crate::config::Config;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::future::Future;
use std::time::Duration;

/// Result of a robots.txt fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// HTTP 2xx with the robots.txt body
    Ok(String),

    /// The host has no robots.txt (404, 410 and other "absent" 4xx)
    NotFound { status_code: u16 },

    /// The server refused to hand out robots.txt (401, 403, 429)
    Forbidden { status_code: u16 },

    /// HTTP 5xx, or any other status we cannot interpret
    ServerError { status_code: u16 },

    /// Transport failure (timeout, DNS, connection refused, redirect limit)
    NetworkError { error: String },
}

/// Retrieves robots.txt for an origin
///
/// Implementations never touch the policy cache; the engine decides what to
/// store.
pub trait PolicyFetcher: Send + Sync {
    /// Fetches `<origin>/robots.txt`, e.g. `https://example.com/robots.txt`
    fn fetch(&self, origin: &str) -> impl Future<Output = FetchOutcome> + Send;
}

/// Builds an HTTP client for robots.txt requests
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use robots_warden::config::{Config, RobotsConfig, UserAgentConfig};
/// use robots_warden::robots::build_http_client;
///
/// let config = Config {
///     user_agent: UserAgentConfig {
///         crawler_name: "ExampleBot".to_string(),
///         crawler_version: "1.0".to_string(),
///         contact_url: "https://example.com/about".to_string(),
///         contact_email: "admin@example.com".to_string(),
///     },
///     robots: RobotsConfig::default(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_millis(config.robots.request_timeout);

    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(config.robots.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Maps a non-success HTTP status to its fetch outcome
///
/// # Status Mapping
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | HTTP 401, 403, 429 | Forbidden |
/// | Other HTTP 4xx | NotFound |
/// | HTTP 5xx | ServerError |
/// | Anything else | ServerError |
pub fn classify_status(status: StatusCode) -> FetchOutcome {
    let status_code = status.as_u16();

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
            FetchOutcome::Forbidden { status_code }
        }
        s if s.is_client_error() => FetchOutcome::NotFound { status_code },
        _ => FetchOutcome::ServerError { status_code },
    }
}

/// reqwest-backed [`PolicyFetcher`]
#[derive(Debug, Clone)]
pub struct HttpPolicyFetcher {
    client: Client,
    max_body_size: usize,
}

impl HttpPolicyFetcher {
    /// Creates a fetcher with a client built from the configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(
            build_http_client(config)?,
            config.robots.max_body_size,
        ))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, max_body_size: usize) -> Self {
        Self {
            client,
            max_body_size,
        }
    }
}

impl PolicyFetcher for HttpPolicyFetcher {
    async fn fetch(&self, origin: &str) -> FetchOutcome {
        let robots_url = format!("{}/robots.txt", origin.trim_end_matches('/'));
        tracing::debug!("Fetching {}", robots_url);

        let response = match self.client.get(&robots_url).send().await {
            Ok(response) => response,
            Err(e) => return classify_transport_error(&e),
        };

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} answered HTTP {}", robots_url, status.as_u16());
            return classify_status(status);
        }

        match read_capped(response, self.max_body_size).await {
            Ok((body, truncated)) => {
                if truncated {
                    tracing::warn!(
                        "{} exceeds {} bytes, ignoring the rest",
                        robots_url,
                        self.max_body_size
                    );
                }
                FetchOutcome::Ok(String::from_utf8_lossy(&body).into_owned())
            }
            Err(e) => classify_transport_error(&e),
        }
    }
}

/// Reads at most `limit` body bytes, chunk by chunk
///
/// Stops pulling from the connection once the limit is reached, so an
/// oversized robots.txt is never buffered in full. The flag reports whether
/// anything was dropped.
async fn read_capped(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<(Vec<u8>, bool), reqwest::Error> {
    let mut body = Vec::new();

    while let Some(chunk) = response.chunk().await? {
        let room = limit - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            let truncated = chunk.len() > room || !matches!(response.chunk().await, Ok(None));
            return Ok((body, truncated));
        }
        body.extend_from_slice(&chunk);
    }

    Ok((body, false))
}

/// Classifies a reqwest error into a network outcome
fn classify_transport_error(e: &reqwest::Error) -> FetchOutcome {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else if e.is_redirect() {
        "Too many redirects".to_string()
    } else {
        e.to_string()
    };

    FetchOutcome::NetworkError { error }
}
