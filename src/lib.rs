//! Recon beacon library.
//!
//! Serves a fresh, uncacheable PNG on a configured path and writes one
//! fingerprint record per request (source port, status, request target,
//! canonical header line) to an append-only log.

pub mod config;
pub mod fingerprint;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::BeaconConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
