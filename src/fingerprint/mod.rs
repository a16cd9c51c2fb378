//! Request fingerprinting subsystem.
//!
//! # Data Flow
//! ```text
//! Beacon hit:
//!     → image.rs (fresh PNG body)
//!     → headers.rs (canonical header line)
//!     → record.rs (LogRecord, enqueue to writer thread)
//!     → sink.rs (append-only, line-atomic write)
//! ```
//!
//! # Design Decisions
//! - Everything except the sink is a pure function of its inputs
//! - The random source is the OS CSPRNG, shared without locking, unless a
//!   `Synthesizer` is built with another one
//! - Records reach the sink after the response is built, never around it

pub mod headers;
pub mod image;
pub mod record;
pub mod sink;

pub use self::headers::HeaderCanonicalizer;
pub use self::image::{RngFactory, SynthesisError, Synthesizer, SyntheticImage};
pub use self::record::{FingerprintLogger, LogRecord, LogWriter, REDACTED_IP};
pub use self::sink::{FileSink, LogSink, MemorySink, OpenMode};
