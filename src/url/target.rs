use crate::{UrlError, UrlResult};
use url::Url;

/// A URL split into the parts the compliance engine works with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Scheme + authority, e.g. `https://example.com` or `http://127.0.0.1:8080`
    pub origin: String,

    /// Path plus query string, matched against robots.txt rules
    pub path: String,
}

/// Parses a raw URL into its origin and request target
///
/// Only absolute `http` and `https` URLs with a host are accepted.
///
/// # Examples
///
/// ```
/// use robots_warden::url::parse_target;
///
/// let target = parse_target("https://Example.COM/a/b?q=1#frag").unwrap();
/// assert_eq!(target.origin, "https://example.com");
/// assert_eq!(target.path, "/a/b?q=1");
/// ```
pub fn parse_target(raw: &str) -> UrlResult<Target> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    let origin = origin_key(&url)?;

    Ok(Target {
        origin,
        path: request_target(&url),
    })
}

/// Extracts the origin used as the policy cache key
///
/// The host is lower-cased by the URL parser and default ports are elided,
/// so `https://EXAMPLE.com:443/x` and `https://example.com/y` share a key.
pub fn origin_key(url: &Url) -> UrlResult<String> {
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::InvalidScheme(other.to_string())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url.origin().ascii_serialization())
}

/// Returns the path and query of a URL, the part robots.txt rules apply to
pub fn request_target(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

/// Encodes a robots.txt rule value the way request targets are encoded
///
/// Rule values come straight from the file (`/über`, `/my docs`), while
/// request targets are percent-encoded by the URL parser. Running the rule
/// through the same encoder lets the two be compared byte for byte. Existing
/// `%XX` escapes are left alone. Values not starting with `/` are returned
/// unchanged; they can never prefix a path.
pub fn encode_rule_path(rule: &str) -> String {
    if !rule.starts_with('/') {
        return rule.to_string();
    }

    let Ok(mut url) = Url::parse("http://rule.invalid/") else {
        return rule.to_string();
    };

    match rule.split_once('?') {
        Some((path, query)) => {
            url.set_path(path);
            url.set_query(Some(query));
        }
        None => url.set_path(rule),
    }

    request_target(&url)
}
