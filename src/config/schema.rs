//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the beacon.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the beacon service.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct BeaconConfig {
    /// Listener configuration (interface, port, connection cap).
    pub listener: ListenerConfig,

    /// Beacon route and the optional log-tail route.
    pub beacon: BeaconRouteConfig,

    /// Fingerprint log file and record policy.
    pub log: LogConfig,

    /// Transport and handler deadlines.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Local IP to listen on. Empty means all interfaces.
    pub ip: String,

    /// TCP port.
    pub port: u16,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl ListenerConfig {
    /// `ip:port` string suitable for binding. IPv6 literals are bracketed.
    pub fn bind_address(&self) -> String {
        let ip = self.ip.trim();
        if ip.is_empty() {
            format!("0.0.0.0:{}", self.port)
        } else if ip.contains(':') && !ip.starts_with('[') {
            format!("[{}]:{}", ip, self.port)
        } else {
            format!("{}:{}", ip, self.port)
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            ip: String::new(),
            port: 8080,
            max_connections: 1024,
        }
    }
}

/// Beacon route configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BeaconRouteConfig {
    /// Path pattern that serves the beacon image.
    ///
    /// `/` answers everything, `/p` only `/p`, `/p/` anything below `/p/`.
    pub path: String,

    /// Serve the tail of the fingerprint log over HTTP.
    pub logs_endpoint: bool,

    /// Path of the log-tail route.
    pub logs_path: String,

    /// How many trailing bytes of the log file the tail route returns.
    pub logs_tail_bytes: u64,
}

impl Default for BeaconRouteConfig {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            logs_endpoint: false,
            logs_path: "/logs".to_string(),
            logs_tail_bytes: 20 * 1024,
        }
    }
}

/// Separator placed between repeated values of one header.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum HeaderDelimiter {
    /// `","`
    Comma,
    /// `", "`
    #[default]
    CommaSpace,
}

impl HeaderDelimiter {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderDelimiter::Comma => ",",
            HeaderDelimiter::CommaSpace => ", ",
        }
    }
}

/// Fingerprint log configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Path of the append-only fingerprint log.
    pub file: String,

    /// Truncate the log file at startup.
    pub truncate_on_start: bool,

    /// Replace the source IP with a fixed marker in every record.
    pub redact_source_ip: bool,

    /// Delimiter used when joining repeated header values.
    pub header_delimiter: HeaderDelimiter,

    /// Records that may wait for the writer before new ones are dropped.
    pub queue_capacity: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: "recon-headers.log".to_string(),
            truncate_on_start: false,
            redact_source_ip: true,
            header_delimiter: HeaderDelimiter::default(),
            queue_capacity: 4096,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for a client to finish sending request headers, in milliseconds.
    pub header_read_ms: u64,

    /// Deadline for producing a response, in milliseconds.
    pub request_ms: u64,
}

impl TimeoutConfig {
    pub fn header_read(&self) -> Duration {
        Duration::from_millis(self.header_read_ms)
    }

    pub fn request(&self) -> Duration {
        Duration::from_millis(self.request_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            header_read_ms: 1000,
            request_ms: 1000,
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum total bytes of header names and values.
    pub max_header_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_header_bytes: 4096,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
