//! Robots-Warden: a robots.txt compliance gate for crawlers
//!
//! This crate decides whether a crawler may fetch a URL and how long it must
//! wait between requests to that host. Policies are fetched from the host's
//! `/robots.txt`, parsed, and cached per origin. Any failure to confirm a
//! policy blocks the host instead of granting access.

pub mod config;
pub mod robots;
pub mod url;

use thiserror::Error;

/// Main error type for Robots-Warden operations
#[derive(Debug, Error)]
pub enum WardenError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Robots-Warden operations
pub type Result<T> = std::result::Result<T, WardenError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use robots::{
    ComplianceCache, ComplianceEngine, FetchOutcome, HttpPolicyFetcher, PolicyFetcher,
    PolicySource, RobotsPolicy,
};
pub use self::url::{parse_target, Target};
