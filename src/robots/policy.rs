//! Per-host robots.txt policy and the allow/disallow decision

use std::time::Duration;

/// Crawl delay applied when a host does not state one (milliseconds)
pub const DEFAULT_CRAWL_DELAY_MS: u64 = 1000;

/// Where a policy came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicySource {
    /// Built from a robots.txt body
    Parsed,
    /// The host has no robots.txt; everything is allowed
    Unrestricted,
    /// robots.txt could not be retrieved; everything is disallowed
    Blocked,
}

/// A host's robots.txt policy for the wildcard user agent
///
/// Immutable once built. Rule lists are empty unless the source is
/// [`PolicySource::Parsed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotsPolicy {
    source: PolicySource,
    allow_rules: Vec<String>,
    disallow_rules: Vec<String>,
    crawl_delay_ms: u64,
}

impl RobotsPolicy {
    /// Creates a policy parsed from a robots.txt body
    pub(crate) fn parsed(
        allow_rules: Vec<String>,
        disallow_rules: Vec<String>,
        crawl_delay_ms: u64,
    ) -> Self {
        Self {
            source: PolicySource::Parsed,
            allow_rules,
            disallow_rules,
            crawl_delay_ms,
        }
    }

    /// Creates the permissive policy used when a host has no robots.txt
    pub fn unrestricted(crawl_delay_ms: u64) -> Self {
        Self {
            source: PolicySource::Unrestricted,
            allow_rules: Vec::new(),
            disallow_rules: Vec::new(),
            crawl_delay_ms,
        }
    }

    /// Creates the fail-closed policy used when robots.txt could not be retrieved
    pub fn blocked(crawl_delay_ms: u64) -> Self {
        Self {
            source: PolicySource::Blocked,
            allow_rules: Vec::new(),
            disallow_rules: Vec::new(),
            crawl_delay_ms,
        }
    }

    /// Parses robots.txt content with the default crawl delay
    ///
    /// # Example
    ///
    /// ```
    /// use robots_warden::RobotsPolicy;
    ///
    /// let policy = RobotsPolicy::from_content("User-agent: *\nDisallow: /admin");
    /// assert!(!policy.is_allowed("/admin/users"));
    /// assert!(policy.is_allowed("/blog"));
    /// ```
    pub fn from_content(content: &str) -> Self {
        super::parser::parse_robots(content, DEFAULT_CRAWL_DELAY_MS)
    }

    pub fn source(&self) -> PolicySource {
        self.source
    }

    pub fn is_unrestricted(&self) -> bool {
        self.source == PolicySource::Unrestricted
    }

    pub fn is_blocked(&self) -> bool {
        self.source == PolicySource::Blocked
    }

    /// Path prefixes explicitly allowed, in file order
    pub fn allow_rules(&self) -> &[String] {
        &self.allow_rules
    }

    /// Path prefixes explicitly disallowed, in file order
    pub fn disallow_rules(&self) -> &[String] {
        &self.disallow_rules
    }

    /// Minimum time between requests to this host, in milliseconds
    pub fn crawl_delay_millis(&self) -> u64 {
        self.crawl_delay_ms
    }

    pub fn crawl_delay(&self) -> Duration {
        Duration::from_millis(self.crawl_delay_ms)
    }

    /// Checks whether a request target (path plus optional query) may be fetched
    ///
    /// The longest matching prefix decides. When an allow rule and a
    /// disallow rule match with the same length, the allow rule wins. A path
    /// matched by no rule is allowed.
    pub fn is_allowed(&self, path: &str) -> bool {
        match self.source {
            PolicySource::Blocked => false,
            PolicySource::Unrestricted => true,
            PolicySource::Parsed => {
                let allow = longest_match(&self.allow_rules, path);
                let disallow = longest_match(&self.disallow_rules, path);

                match (allow, disallow) {
                    (_, None) => true,
                    (None, Some(_)) => false,
                    (Some(allow_len), Some(disallow_len)) => allow_len >= disallow_len,
                }
            }
        }
    }
}

/// Length of the longest rule that is a prefix of `path`
fn longest_match(rules: &[String], path: &str) -> Option<usize> {
    rules
        .iter()
        .filter(|rule| path.starts_with(rule.as_str()))
        .map(String::len)
        .max()
}
