//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (header byte budget)
//!     → Pass to routing
//!
//! Outgoing beacon response:
//!     → headers.rs (strip validators, force no-cache)
//! ```
//!
//! # Design Decisions
//! - Small budgets: a beacon needs nothing beyond a few request headers
//! - Fail closed: oversized requests never reach a handler
//! - No trust in client input

pub mod headers;
pub mod limits;

pub use headers::apply_no_cache;
pub use limits::enforce_header_budget;
