//! Robots.txt parser implementation
//!
//! Only groups addressed to the wildcard agent `*` are read. Matching is on
//! literal path prefixes; `*` and `$` inside rule values carry no special
//! meaning. Rule values are percent-encoded like request targets so that
//! `Disallow: /über` matches `https://host/über`.

use crate::robots::RobotsPolicy;
use crate::url::encode_rule_path;

/// Parses raw robots.txt content into a policy
///
/// Parsing never fails: lines without a `key: value` shape, unknown
/// directives and rules outside any user-agent group are skipped.
///
/// # Arguments
///
/// * `content` - The raw robots.txt body
/// * `default_delay_ms` - Crawl delay used when no valid `Crawl-delay` applies
///
/// # Returns
///
/// A policy with provenance [`PolicySource::Parsed`](crate::robots::PolicySource::Parsed)
pub fn parse_robots(content: &str, default_delay_ms: u64) -> RobotsPolicy {
    let mut allow_rules = Vec::new();
    let mut disallow_rules = Vec::new();
    let mut crawl_delay_ms: Option<u64> = None;

    // Agents of the group being read. Consecutive User-agent lines share a
    // group; the first rule line closes the agent list.
    let mut current_agents: Vec<String> = Vec::new();
    let mut in_rules = false;

    for (line_number, raw_line) in content.lines().enumerate() {
        let line = strip_comment(raw_line).trim();

        if line.is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            tracing::trace!("Skipping robots.txt line {}: no directive", line_number + 1);
            continue;
        };

        let key = key.trim().to_lowercase();
        let value = value.trim();

        if key == "user-agent" {
            if in_rules {
                current_agents.clear();
                in_rules = false;
            }
            current_agents.push(value.to_lowercase());
            continue;
        }

        let applies = current_agents.iter().any(|agent| agent == "*");

        match key.as_str() {
            "allow" | "disallow" | "crawl-delay" => in_rules = true,
            _ => {}
        }

        if !applies {
            continue;
        }

        match key.as_str() {
            "allow" => {
                if !value.is_empty() {
                    allow_rules.push(encode_rule_path(value));
                }
            }
            "disallow" => {
                // An empty Disallow means nothing is disallowed
                if !value.is_empty() {
                    disallow_rules.push(encode_rule_path(value));
                }
            }
            "crawl-delay" => {
                if crawl_delay_ms.is_none() {
                    crawl_delay_ms = parse_crawl_delay(value);
                    if crawl_delay_ms.is_none() {
                        tracing::trace!(
                            "Ignoring invalid Crawl-delay '{}' on line {}",
                            value,
                            line_number + 1
                        );
                    }
                }
            }
            _ => {
                tracing::trace!(
                    "Skipping unsupported robots.txt directive '{}' on line {}",
                    key,
                    line_number + 1
                );
            }
        }
    }

    RobotsPolicy::parsed(
        allow_rules,
        disallow_rules,
        crawl_delay_ms.unwrap_or(default_delay_ms),
    )
}

/// Removes a `#` comment and everything after it
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(index) => &line[..index],
        None => line,
    }
}

/// Converts a Crawl-delay value in seconds to milliseconds
///
/// Fractional seconds are accepted. Negative, non-finite and non-numeric
/// values yield `None`.
fn parse_crawl_delay(value: &str) -> Option<u64> {
    let seconds = value.parse::<f64>().ok()?;

    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }

    Some((seconds * 1000.0).round() as u64)
}
