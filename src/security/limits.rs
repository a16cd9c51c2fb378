//! Request header limits.
//!
//! # Responsibilities
//! - Enforce a total byte budget over header names and values
//!
//! # Design Decisions
//! - Checked before any handler runs (early rejection)
//! - Return 431 Request Header Fields Too Large
//! - Bodies are never read, so no body limit applies

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Sum of header name and value lengths.
pub fn header_bytes(headers: &HeaderMap) -> usize {
    headers
        .iter()
        .map(|(name, value)| name.as_str().len() + value.len())
        .sum()
}

/// Reject requests whose headers exceed `max_header_bytes`.
pub async fn enforce_header_budget(
    State(max_header_bytes): State<usize>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let size = header_bytes(req.headers());
    if size > max_header_bytes {
        tracing::warn!(
            size,
            limit = max_header_bytes,
            path = %req.uri().path(),
            "Header budget exceeded"
        );
        return (
            StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE,
            "431 Request Header Fields Too Large",
        )
            .into_response();
    }
    next.run(req).await
}
