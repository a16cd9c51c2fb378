//! Startup orchestration.
//!
//! # Responsibilities
//! - Open the fingerprint log and start its writer
//! - Start the metrics exporter when enabled
//! - Bind the listener last, so traffic arrives only when ready
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, including an unwritable log
//! - Subsystems initialize in order, not concurrently

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::BeaconConfig;
use crate::fingerprint::{FileSink, FingerprintLogger, LogWriter, OpenMode};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::net::{Listener, ListenerError};
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cannot open fingerprint log {path}: {source}")]
    LogFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot start fingerprint writer: {0}")]
    Writer(#[source] std::io::Error),

    #[error("cannot start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("server task failed: {0}")]
    Server(String),
}

/// A started beacon service.
pub struct Running {
    local_addr: SocketAddr,
    shutdown: Shutdown,
    server: JoinHandle<std::io::Result<()>>,
    writer: LogWriter,
}

/// Start every subsystem for `config`.
///
/// The config is expected to be validated already.
pub async fn start(config: BeaconConfig) -> Result<Running, StartupError> {
    let mode = if config.log.truncate_on_start {
        OpenMode::Truncate
    } else {
        OpenMode::Append
    };
    let sink = FileSink::open(&config.log.file, mode).map_err(|source| StartupError::LogFile {
        path: config.log.file.clone(),
        source,
    })?;
    let (logger, writer) = FingerprintLogger::spawn(
        Arc::new(sink),
        config.log.redact_source_ip,
        config.log.queue_capacity,
    )
    .map_err(StartupError::Writer)?;

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr)?;
        }
    }

    let listener = Listener::bind(&config.listener).await?;
    let local_addr = listener.local_addr().map_err(|source| ListenerError::Bind {
        address: config.listener.bind_address(),
        source,
    })?;

    tracing::info!(
        address = %local_addr,
        beacon = %config.beacon.path,
        log_file = %config.log.file,
        redact_source_ip = config.log.redact_source_ip,
        "recon-beacon ready"
    );

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, logger);
    let server = tokio::spawn(server.run(listener, shutdown.subscribe()));

    Ok(Running {
        local_addr,
        shutdown,
        server,
        writer,
    })
}

impl Running {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting, drain connections, and flush the fingerprint log.
    ///
    /// Returns the number of records written during the run.
    pub async fn stop(self) -> Result<u64, StartupError> {
        self.shutdown.trigger();
        match self.server.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(StartupError::Server(e.to_string())),
            Err(e) => return Err(StartupError::Server(e.to_string())),
        }

        let writer = self.writer;
        tokio::task::spawn_blocking(move || writer.join())
            .await
            .map_err(|e| StartupError::Server(e.to_string()))
    }
}
