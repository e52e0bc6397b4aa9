//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching
//! robots.txt policies, and the engine that answers "may I fetch this URL,
//! and how long must I wait?" for crawl workers.

mod cache;
mod engine;
mod fetcher;
mod parser;
mod policy;

pub use cache::{CachedPolicy, ComplianceCache};
pub use engine::ComplianceEngine;
pub use fetcher::{build_http_client, classify_status, FetchOutcome, HttpPolicyFetcher, PolicyFetcher};
pub use parser::parse_robots;
pub use policy::{PolicySource, RobotsPolicy, DEFAULT_CRAWL_DELAY_MS};
