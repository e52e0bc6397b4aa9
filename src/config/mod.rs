//! Configuration module for Robots-Warden
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use robots_warden::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("warden.toml")).unwrap();
//! println!("robots.txt timeout: {}ms", config.robots.request_timeout);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, RobotsConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
