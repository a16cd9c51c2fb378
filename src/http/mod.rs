//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (hyper HTTP/1.1, header-read deadline, middleware)
//!     → logs.rs (log tail, when enabled)
//!     → beacon.rs (route decision → image or 404 → fingerprint record)
//!     → error.rs (request-scoped failures → short fixed responses)
//!     → Send to client
//! ```

pub mod beacon;
pub mod error;
pub mod logs;
pub mod server;

pub use error::BeaconError;
pub use server::{AppState, HttpServer};
