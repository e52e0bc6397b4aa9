//! URL handling module for Robots-Warden
//!
//! robots.txt policies are scoped to an origin (scheme + host + port), so
//! every URL checked against the engine is split into the origin used as the
//! cache key and the request target matched against the rules.

mod target;

pub use target::{encode_rule_path, origin_key, parse_target, request_target, Target};
