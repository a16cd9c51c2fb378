//! Fingerprint records and the write-behind logger.
//!
//! # Record format
//! ```text
//! 2026-10-15T09:30:12Z (Src IP Redacted) 51234 200 "/recon/x.png?id=7" accept:"*/*" user-agent:"curl/8.5.0"
//! ```
//!
//! # Design Decisions
//! - Handlers only enqueue; a dedicated writer thread owns the sink
//! - `record` never blocks and never fails for the caller
//! - The queue is bounded; when a stalled sink fills it, new records are
//!   dropped with a warning instead of growing memory
//! - Sink errors are reported through `tracing` and otherwise dropped

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::JoinHandle;

use axum::http::StatusCode;
use chrono::{DateTime, SecondsFormat, Utc};
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::fingerprint::headers::quote;
use crate::fingerprint::sink::LogSink;

/// Placeholder written instead of the source IP when redaction is on.
pub const REDACTED_IP: &str = "(Src IP Redacted)";

/// One observed request.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub status: StatusCode,
    pub source: SocketAddr,
    /// Raw request target (path and query).
    pub target: String,
    /// Canonical header line.
    pub header_line: String,
}

impl LogRecord {
    pub fn new(status: StatusCode, source: SocketAddr, target: &str, header_line: String) -> Self {
        Self {
            timestamp: Utc::now(),
            status,
            source,
            target: target.to_string(),
            header_line,
        }
    }

    /// Render the record as a single log line (no trailing newline).
    pub fn render(&self, redact_source_ip: bool) -> String {
        let ip = if redact_source_ip {
            REDACTED_IP.to_string()
        } else {
            self.source.ip().to_string()
        };

        let mut line = format!(
            "{} {} {} {} {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            ip,
            self.source.port(),
            self.status.as_u16(),
            quote(&self.target),
        );
        if !self.header_line.is_empty() {
            line.push(' ');
            line.push_str(&self.header_line);
        }
        line
    }
}

/// Cloneable handle that enqueues records for the writer thread.
#[derive(Debug, Clone)]
pub struct FingerprintLogger {
    tx: mpsc::Sender<String>,
    redact_source_ip: bool,
}

/// Join handle for the writer thread.
#[derive(Debug)]
pub struct LogWriter {
    handle: JoinHandle<u64>,
}

impl LogWriter {
    /// Wait for the writer to drain. Returns the number of lines written.
    ///
    /// Only returns once every [`FingerprintLogger`] clone has been dropped.
    pub fn join(self) -> u64 {
        self.handle.join().unwrap_or_else(|_| {
            tracing::error!("Fingerprint writer thread panicked");
            0
        })
    }
}

impl FingerprintLogger {
    /// Start the writer thread that owns `sink`, queueing at most
    /// `capacity` records.
    pub fn spawn(
        sink: Arc<dyn LogSink>,
        redact_source_ip: bool,
        capacity: usize,
    ) -> io::Result<(Self, LogWriter)> {
        let (tx, mut rx) = mpsc::channel::<String>(capacity.max(1));

        let handle = std::thread::Builder::new()
            .name("fingerprint-log".into())
            .spawn(move || {
                let mut written = 0u64;
                while let Some(line) = rx.blocking_recv() {
                    match sink.write_line(&line) {
                        Ok(()) => written += 1,
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to write fingerprint record");
                        }
                    }
                }
                tracing::debug!(written, "Fingerprint writer drained");
                written
            })?;

        Ok((
            Self {
                tx,
                redact_source_ip,
            },
            LogWriter { handle },
        ))
    }

    /// Enqueue one record.
    pub fn record(&self, status: StatusCode, source: SocketAddr, target: &str, header_line: String) {
        let record = LogRecord::new(status, source, target, header_line);
        self.submit(&record);
    }

    /// Enqueue an already built record.
    pub fn submit(&self, record: &LogRecord) {
        match self.tx.try_send(record.render(self.redact_source_ip)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    status = record.status.as_u16(),
                    target = %record.target,
                    "Fingerprint queue full, record dropped"
                );
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!(status = record.status.as_u16(), "Fingerprint writer stopped, record dropped");
            }
        }
    }
}
