//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Hold the single compiled beacon pattern
//! - Decide Beacon or NotFound for every request path
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Exactly one beacon binding; the 404 catch-all exists only when the
//!   beacon pattern is not `/`, so the two can never both claim `/`
//! - Explicit NotFound rather than silent default

use crate::routing::matcher::{Matcher, RoutePattern};

/// Outcome of routing one request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Serve the beacon image.
    Beacon,
    /// Serve the 404 catch-all.
    NotFound,
}

impl RouteDecision {
    /// Label used in metrics and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteDecision::Beacon => "beacon",
            RouteDecision::NotFound => "not_found",
        }
    }
}

/// Router deciding which handler a path reaches.
#[derive(Debug, Clone)]
pub struct BeaconRouter {
    pattern: RoutePattern,
}

impl BeaconRouter {
    /// Build a router from a configured beacon path.
    pub fn new(path: &str) -> Self {
        let pattern = RoutePattern::parse(path);
        tracing::debug!(pattern = %pattern, catch_all = !pattern.is_wildcard(), "Beacon route compiled");
        Self { pattern }
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// Whether a 404 catch-all is bound to `/`.
    pub fn has_catch_all(&self) -> bool {
        !self.pattern.is_wildcard()
    }

    /// Route a request path.
    pub fn route(&self, path: &str) -> RouteDecision {
        if self.pattern.matches(path) {
            RouteDecision::Beacon
        } else {
            RouteDecision::NotFound
        }
    }
}
