//! Recon beacon (v1)
//!
//! Serves a unique, non-cacheable PNG and records a fingerprint of every
//! request that reaches it.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────────────▶ net::listener ─▶ http::server ─▶ security::limits
//!                                                          │
//!                                                          ▼
//!                                                   routing::router
//!                                                    │            │
//!                                               Beacon        NotFound
//!                                                    │            │
//!                                   security::headers │            │
//!                                   fingerprint::image│            │ 404
//!                                                    ▼            ▼
//!     Client Response ◀──────────────────────────── response ─────┘
//!                                                    │
//!                                                    ▼
//!                                  fingerprint::record ─▶ writer thread ─▶ log file
//! ```

use std::path::PathBuf;

use clap::Parser;

use recon_beacon::config::{self, BeaconConfig};
use recon_beacon::lifecycle::{self, signals};
use recon_beacon::observability::logging;

#[derive(Parser, Debug)]
#[command(name = "recon-beacon")]
#[command(version, about = "Serve a unique PNG and log who fetched it", long_about = None)]
struct Cli {
    /// TOML configuration file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Local IP address to listen on (default: all interfaces)
    #[arg(long)]
    ip: Option<String>,

    /// Port to listen on (default: 8080)
    #[arg(long)]
    port: Option<u16>,

    /// Path that returns the image
    ///
    ///   "/"           respond to any path
    ///   "/recon"      respond only to "/recon"
    ///   "/recon.png"  respond only to "/recon.png"
    ///   "/recon/"     respond to "/recon/" and anything below it
    #[arg(long, verbatim_doc_comment)]
    uri: Option<String>,

    /// Fingerprint log file (default: recon-headers.log)
    #[arg(long)]
    logfile: Option<String>,

    /// Truncate the fingerprint log at startup
    #[arg(long)]
    truncate_log: bool,

    /// Write the source IP instead of redacting it
    #[arg(long)]
    show_source_ip: bool,

    /// Serve the tail of the fingerprint log at /logs
    #[arg(long)]
    logs_endpoint: bool,

    /// Diagnostics level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Defaults, then the config file, then flags.
    fn into_config(self) -> Result<BeaconConfig, config::ConfigError> {
        let mut config = match &self.config {
            Some(path) => config::load_config(path)?,
            None => BeaconConfig::default(),
        };

        if let Some(ip) = self.ip {
            config.listener.ip = ip;
        }
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(uri) = self.uri {
            config.beacon.path = uri;
        }
        if let Some(logfile) = self.logfile {
            config.log.file = logfile;
        }
        if self.truncate_log {
            config.log.truncate_on_start = true;
        }
        if self.show_source_ip {
            config.log.redact_source_ip = false;
        }
        if self.logs_endpoint {
            config.beacon.logs_endpoint = true;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }

        config::finalize(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(&config.observability.log_level);
    tracing::info!("recon-beacon v{} starting", env!("CARGO_PKG_VERSION"));

    let running = lifecycle::start(config).await.map_err(|e| {
        tracing::error!(error = %e, "Startup failed");
        e
    })?;

    signals::wait_for_signal().await;

    let written = running.stop().await?;
    tracing::info!(records = written, "Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "recon-beacon",
            "--port",
            "9000",
            "--uri",
            "recon/",
            "--logfile",
            "x.log",
            "--show-source-ip",
        ]);
        let config = cli.into_config().unwrap();
        assert_eq!(config.listener.port, 9000);
        assert_eq!(config.beacon.path, "recon/");
        assert_eq!(config.log.file, "x.log");
        assert!(!config.log.redact_source_ip);
        assert!(!config.log.truncate_on_start);
    }

    #[test]
    fn test_invalid_flags_rejected() {
        let cli = Cli::parse_from(["recon-beacon", "--port", "0"]);
        assert!(cli.into_config().is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
