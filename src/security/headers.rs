//! Cache-defeat response headers.
//!
//! # Responsibilities
//! - Strip validators and origin headers that let a cache reuse a response
//! - Force every intermediary and browser to treat the response as stale
//!
//! # Design Decisions
//! - Deletions happen before sets
//! - Sets overwrite, so applying the policy twice equals applying it once
//! - Pure header mutation, no I/O

use std::sync::LazyLock;
use std::time::UNIX_EPOCH;

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};

/// Headers removed from every beacon response.
pub const STRIPPED: [HeaderName; 7] = [
    header::ETAG,
    header::IF_MODIFIED_SINCE,
    header::IF_MATCH,
    header::IF_NONE_MATCH,
    header::IF_RANGE,
    header::IF_UNMODIFIED_SINCE,
    header::ORIGIN,
];

pub const CACHE_CONTROL_VALUE: &str = "no-cache, private, max-age=0";

const X_ACCEL_EXPIRES: HeaderName = HeaderName::from_static("x-accel-expires");

/// `Thu, 01 Jan 1970 00:00:00 GMT`
static EPOCH_EXPIRES: LazyLock<HeaderValue> = LazyLock::new(|| {
    HeaderValue::from_str(&httpdate::fmt_http_date(UNIX_EPOCH))
        .unwrap_or_else(|_| HeaderValue::from_static("Thu, 01 Jan 1970 00:00:00 GMT"))
});

/// Rewrite `headers` so no cache will store or reuse the response.
pub fn apply_no_cache(headers: &mut HeaderMap) {
    for name in &STRIPPED {
        headers.remove(name);
    }

    headers.insert(header::EXPIRES, EPOCH_EXPIRES.clone());
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(X_ACCEL_EXPIRES, HeaderValue::from_static("0"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sets_and_strips() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ETAG, HeaderValue::from_static("\"abc\""));
        headers.insert(header::ORIGIN, HeaderValue::from_static("https://evil.example"));
        headers.append(header::CACHE_CONTROL, HeaderValue::from_static("public"));
        headers.append(header::CACHE_CONTROL, HeaderValue::from_static("max-age=600"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));

        apply_no_cache(&mut headers);

        assert!(headers.get(header::ETAG).is_none());
        assert!(headers.get(header::ORIGIN).is_none());
        assert_eq!(headers.get_all(header::CACHE_CONTROL).iter().count(), 1);
        assert_eq!(headers[header::CACHE_CONTROL], CACHE_CONTROL_VALUE);
        assert_eq!(headers[header::EXPIRES], "Thu, 01 Jan 1970 00:00:00 GMT");
        assert_eq!(headers[header::PRAGMA], "no-cache");
        assert_eq!(headers["x-accel-expires"], "0");
        assert_eq!(headers[header::CONTENT_TYPE], "image/png");
    }

    #[test]
    fn test_idempotent() {
        let mut once = HeaderMap::new();
        once.insert(header::IF_NONE_MATCH, HeaderValue::from_static("*"));
        once.insert(header::CONTENT_LENGTH, HeaderValue::from_static("12"));
        let mut twice = once.clone();

        apply_no_cache(&mut once);
        apply_no_cache(&mut twice);
        apply_no_cache(&mut twice);

        assert_eq!(once, twice);
        assert_eq!(once.len(), 5);
    }
}
