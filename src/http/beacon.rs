//! Beacon and catch-all handlers.
//!
//! Every request that is not claimed by another route lands in
//! [`dispatch`], which asks the [`BeaconRouter`](crate::routing::BeaconRouter)
//! whether the path is the beacon or the 404 catch-all. Both outcomes are
//! fingerprinted; the record is enqueued only after the response is built.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
};

use crate::fingerprint::image::{Synthesizer, CONTENT_TYPE};
use crate::http::error::{BeaconError, NOT_FOUND_BODY};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::RouteDecision;
use crate::security::apply_no_cache;

/// Fallback handler for every path outside the explicit routes.
pub async fn dispatch(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let decision = state.router.route(request.uri().path());

    let response = match decision {
        RouteDecision::Beacon => beacon_response(&state.synthesizer),
        RouteDecision::NotFound => not_found_response(),
    };
    let status = response.status();

    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| request.uri().path());

    tracing::debug!(
        route = decision.as_str(),
        status = status.as_u16(),
        peer = %peer,
        path = %target,
        "Beacon request"
    );

    state.logger.record(
        status,
        peer,
        target,
        state.canonicalizer.canonicalize(request.headers()),
    );
    metrics::record_request(decision.as_str(), status.as_u16(), start);

    response
}

/// A fresh, uncacheable PNG.
pub fn beacon_response(synthesizer: &Synthesizer) -> Response {
    match synthesizer.synthesize() {
        Ok(png) => {
            let mut response = (
                StatusCode::OK,
                [(header::CONTENT_TYPE, CONTENT_TYPE)],
                png.bytes,
            )
                .into_response();
            apply_no_cache(response.headers_mut());
            response
        }
        Err(e) => BeaconError::from(e).into_response(),
    }
}

pub fn not_found_response() -> Response {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
}
