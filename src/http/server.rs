//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router (beacon fallback, optional log tail)
//! - Wire up middleware (tracing, timeout, header budget)
//! - Leave request bodies unread so every beacon hit is recorded
//! - Run the bounded accept loop and serve HTTP/1.1 with hyper
//! - Enforce the header-read deadline per connection
//! - Drain live connections on shutdown

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::ConnectInfo,
    http::Request,
    middleware::from_fn_with_state,
    routing::any,
    Router,
};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, watch};
use tower::ServiceExt;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::BeaconConfig;
use crate::fingerprint::{FingerprintLogger, HeaderCanonicalizer, Synthesizer};
use crate::http::beacon;
use crate::http::logs::{self, LogTail};
use crate::net::{ConnectionGuard, ConnectionPermit, ConnectionTracker, Listener, ListenerError};
use crate::routing::BeaconRouter;
use crate::security::enforce_header_budget;

/// How long shutdown waits for in-flight connections.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<BeaconRouter>,
    pub canonicalizer: HeaderCanonicalizer,
    pub synthesizer: Synthesizer,
    pub logger: FingerprintLogger,
    pub log_tail: Option<LogTail>,
}

impl AppState {
    pub fn new(config: &BeaconConfig, logger: FingerprintLogger) -> Self {
        let log_tail = config.beacon.logs_endpoint.then(|| LogTail {
            path: Arc::new(PathBuf::from(&config.log.file)),
            max_bytes: config.beacon.logs_tail_bytes,
        });

        let router = BeaconRouter::new(&config.beacon.path);
        tracing::info!(
            pattern = %router.pattern(),
            catch_all = router.has_catch_all(),
            "Beacon route installed"
        );

        Self {
            router: Arc::new(router),
            canonicalizer: HeaderCanonicalizer::new(config.log.header_delimiter),
            synthesizer: Synthesizer::default(),
            logger,
            log_tail,
        }
    }

    /// Replace the image random source.
    pub fn with_synthesizer(mut self, synthesizer: Synthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }
}

/// HTTP server for the beacon.
pub struct HttpServer {
    router: Router,
    config: BeaconConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: BeaconConfig, logger: FingerprintLogger) -> Self {
        let state = AppState::new(&config, logger);
        Self::with_state(config, state)
    }

    /// Create a server around prepared handler state.
    pub fn with_state(config: BeaconConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &BeaconConfig, state: AppState) -> Router {
        let mut router = Router::new();
        if let Some(tail) = state.log_tail.as_ref() {
            tracing::info!(
                path = %config.beacon.logs_path,
                file = %tail.path.display(),
                "Log tail endpoint enabled"
            );
            router = router.route(&config.beacon.logs_path, any(logs::tail_logs));
        }

        router
            .fallback(beacon::dispatch)
            .with_state(state)
            .layer(from_fn_with_state(
                config.limits.max_header_bytes,
                enforce_header_budget,
            ))
            .layer(TimeoutLayer::new(config.timeouts.request()))
            .layer(TraceLayer::new_for_http())
    }

    /// The assembled router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain connections.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            beacon = %self.config.beacon.path,
            "HTTP server starting"
        );

        let tracker = ConnectionTracker::new();
        let (drain_tx, drain_rx) = watch::channel(false);
        let header_read_timeout = self.config.timeouts.header_read();

        loop {
            tokio::select! {
                _ = shutdown.recv() => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer, permit)) => {
                        let conn = Connection {
                            router: self.router.clone(),
                            peer,
                            header_read_timeout,
                            _permit: permit,
                            guard: tracker.track(),
                        };
                        tokio::spawn(conn.serve(stream, drain_rx.clone()));
                    }
                    Err(ListenerError::Closed) => break,
                    Err(e) => {
                        tracing::warn!(error = %e, "Accept failed");
                        tokio::time::sleep(Duration::from_millis(50)).await;
                    }
                },
            }
        }

        tracing::info!(active = tracker.active_count(), "Draining connections");
        let _ = drain_tx.send(true);
        drop(listener);
        if !tracker.wait_idle(DRAIN_TIMEOUT).await {
            tracing::warn!(active = tracker.active_count(), "Drain timed out");
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// One accepted client connection.
struct Connection {
    router: Router,
    peer: SocketAddr,
    header_read_timeout: Duration,
    _permit: ConnectionPermit,
    guard: ConnectionGuard,
}

impl Connection {
    async fn serve(self, stream: TcpStream, mut drain: watch::Receiver<bool>) {
        let peer = self.peer;
        let router = self.router;
        let service = service_fn(move |mut req: Request<Incoming>| {
            req.extensions_mut().insert(ConnectInfo(peer));
            router.clone().oneshot(req)
        });

        let conn = http1::Builder::new()
            .timer(TokioTimer::new())
            .header_read_timeout(self.header_read_timeout)
            .serve_connection(TokioIo::new(stream), service);
        tokio::pin!(conn);

        let result = tokio::select! {
            res = conn.as_mut() => res,
            _ = drain.changed() => {
                conn.as_mut().graceful_shutdown();
                conn.as_mut().await
            }
        };

        if let Err(e) = result {
            tracing::debug!(
                connection_id = %self.guard.id(),
                peer = %peer,
                error = %e,
                "Connection closed with error"
            );
        }
    }
}
