//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (route lookup)
//!     → matcher.rs (evaluate the beacon pattern)
//!     → Return: Beacon or NotFound
//!
//! Route Compilation (at startup):
//!     beacon path string
//!     → normalize (blank → "/", ensure leading "/")
//!     → RoutePattern (Wildcard | Exact | PrefixWildcard)
//!     → Freeze as immutable BeaconRouter
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (exact or prefix comparison only)
//! - Deterministic: same input always yields the same decision

pub mod matcher;
pub mod router;

pub use matcher::{Matcher, RoutePattern};
pub use router::{BeaconRouter, RouteDecision};
