//! Canonical header line.
//!
//! Serializes a request's header multimap into one deterministic,
//! single-line string:
//!
//! ```text
//! accept:"*/*" user-agent:"curl/8.5.0" x-foo:"a, b"
//! ```
//!
//! Names are sorted by byte value. Repeated values of one name are joined
//! in arrival order, literal `"` bytes are dropped, and the result is
//! quoted with every non-printable or non-ASCII byte escaped.

use std::fmt::Write as _;

use axum::http::HeaderMap;

use crate::config::HeaderDelimiter;

/// Builds canonical header lines with a fixed value delimiter.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderCanonicalizer {
    delimiter: HeaderDelimiter,
}

impl HeaderCanonicalizer {
    pub fn new(delimiter: HeaderDelimiter) -> Self {
        Self { delimiter }
    }

    /// Serialize `headers` into a canonical header line.
    ///
    /// Output depends only on the set of names and the per-name value
    /// lists, never on the map's iteration order.
    pub fn canonicalize(&self, headers: &HeaderMap) -> String {
        // HeaderName is already lowercase.
        let mut names: Vec<&str> = headers.keys().map(|name| name.as_str()).collect();
        names.sort_unstable();
        names.dedup();

        let delimiter = self.delimiter.as_str().as_bytes();
        let mut line = String::new();
        let mut joined = Vec::new();

        for (i, name) in names.iter().enumerate() {
            joined.clear();
            for (n, value) in headers.get_all(*name).iter().enumerate() {
                if n > 0 {
                    joined.extend_from_slice(delimiter);
                }
                joined.extend(value.as_bytes().iter().copied().filter(|b| *b != b'"'));
            }

            if i > 0 {
                line.push(' ');
            }
            line.push_str(name);
            line.push(':');
            push_quoted(&mut line, &joined);
        }

        line
    }
}

/// Append `bytes` as a double-quoted literal.
///
/// Printable ASCII passes through, everything else becomes `\n`, `\t`,
/// `\\`, `\"` or `\xNN`.
pub fn push_quoted(out: &mut String, bytes: &[u8]) {
    out.push('"');
    // Writing into a String cannot fail.
    let _ = write!(out, "{}", bytes.escape_ascii());
    out.push('"');
}

/// Quote a string the same way header values are quoted.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    push_quoted(&mut out, value.as_bytes());
    out
}
