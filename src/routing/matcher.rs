//! Path pattern matching.
//!
//! # Responsibilities
//! - Parse a configured beacon path into a `RoutePattern`
//! - Match request paths against the pattern
//!
//! # Design Decisions
//! - Path matching is case-sensitive and byte-exact
//! - No regex, no percent-decoding: the raw request path is compared
//! - A pattern ending in `/` covers everything below it

use std::fmt;

/// Trait for matching request paths against a condition.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// A compiled beacon path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePattern {
    /// `/`: every path.
    Wildcard,
    /// `/p`: only `/p`.
    Exact(String),
    /// `/p/`: `/p/` and everything below it.
    PrefixWildcard(String),
}

impl RoutePattern {
    /// Parse a configured path.
    ///
    /// Blank input becomes `/`, and a missing leading slash is prepended.
    pub fn parse(raw: &str) -> Self {
        let path = normalize_path(raw);
        if path == "/" {
            RoutePattern::Wildcard
        } else if path.ends_with('/') {
            RoutePattern::PrefixWildcard(path)
        } else {
            RoutePattern::Exact(path)
        }
    }

    /// The normalized path this pattern was built from.
    pub fn as_str(&self) -> &str {
        match self {
            RoutePattern::Wildcard => "/",
            RoutePattern::Exact(p) | RoutePattern::PrefixWildcard(p) => p,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, RoutePattern::Wildcard)
    }
}

impl Matcher for RoutePattern {
    fn matches(&self, path: &str) -> bool {
        match self {
            RoutePattern::Wildcard => true,
            RoutePattern::Exact(p) => path == p,
            RoutePattern::PrefixWildcard(p) => path.starts_with(p.as_str()),
        }
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trim whitespace, default blank paths to `/`, and ensure a leading slash.
pub fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kinds() {
        assert_eq!(RoutePattern::parse("/"), RoutePattern::Wildcard);
        assert_eq!(RoutePattern::parse(""), RoutePattern::Wildcard);
        assert_eq!(RoutePattern::parse("  "), RoutePattern::Wildcard);
        assert_eq!(RoutePattern::parse("/r"), RoutePattern::Exact("/r".into()));
        assert_eq!(RoutePattern::parse("r"), RoutePattern::Exact("/r".into()));
        assert_eq!(
            RoutePattern::parse("recon/"),
            RoutePattern::PrefixWildcard("/recon/".into())
        );
    }

    #[test]
    fn test_exact_matcher() {
        let pattern = RoutePattern::parse("/recon.png");
        assert!(pattern.matches("/recon.png"));
        assert!(!pattern.matches("/recon.png/"));
        assert!(!pattern.matches("/RECON.png")); // Case sensitive
        assert!(!pattern.matches("/"));
    }

    #[test]
    fn test_prefix_matcher() {
        let pattern = RoutePattern::parse("/r/");
        assert!(pattern.matches("/r/"));
        assert!(pattern.matches("/r/x/y"));
        assert!(!pattern.matches("/r"));
        assert!(!pattern.matches("/rx"));
    }
}
