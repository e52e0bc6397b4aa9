use serde::Deserialize;

/// Main configuration structure for Robots-Warden
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub robots: RobotsConfig,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// robots.txt retrieval and policy defaults
#[derive(Debug, Clone, Deserialize)]
pub struct RobotsConfig {
    /// Bounded timeout for a single robots.txt request (milliseconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Crawl delay used when a policy does not specify one (milliseconds)
    #[serde(rename = "default-crawl-delay", default = "default_crawl_delay")]
    pub default_crawl_delay: u64,

    /// Maximum number of robots.txt bytes kept; the rest is dropped
    #[serde(rename = "max-body-size", default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Maximum number of redirects followed while fetching robots.txt
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            default_crawl_delay: default_crawl_delay(),
            max_body_size: default_max_body_size(),
            max_redirects: default_max_redirects(),
        }
    }
}

fn default_request_timeout() -> u64 {
    10_000
}

fn default_crawl_delay() -> u64 {
    crate::robots::DEFAULT_CRAWL_DELAY_MS
}

fn default_max_body_size() -> usize {
    512 * 1024
}

fn default_max_redirects() -> usize {
    5
}
