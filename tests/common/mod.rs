//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use tower::ServiceExt;

use recon_beacon::config::BeaconConfig;
use recon_beacon::fingerprint::{FingerprintLogger, LogWriter, MemorySink, Synthesizer};
use recon_beacon::http::{AppState, HttpServer};

pub const PEER: &str = "198.51.100.7:40123";

/// Config with the beacon at `path` and the log file inside `dir`.
pub fn config_in(dir: &Path, path: &str) -> BeaconConfig {
    let mut config = BeaconConfig::default();
    config.beacon.path = path.to_string();
    config.log.file = dir.join("beacon.log").display().to_string();
    config.listener.ip = "127.0.0.1".to_string();
    config.listener.port = 0;
    config
}

/// An in-process beacon whose records land in memory.
pub struct InProcess {
    server: HttpServer,
    writer: LogWriter,
    pub sink: MemorySink,
}

impl InProcess {
    pub fn new(config: BeaconConfig) -> Self {
        Self::with_synthesizer(config, Synthesizer::default())
    }

    /// Like [`InProcess::new`], drawing image randomness from `synthesizer`.
    pub fn with_synthesizer(config: BeaconConfig, synthesizer: Synthesizer) -> Self {
        let sink = MemorySink::new();
        let (logger, writer) = FingerprintLogger::spawn(
            Arc::new(sink.clone()),
            config.log.redact_source_ip,
            config.log.queue_capacity,
        )
        .unwrap();
        let state = AppState::new(&config, logger).with_synthesizer(synthesizer);
        Self {
            server: HttpServer::with_state(config, state),
            writer,
            sink,
        }
    }

    /// Send one request as if it came from [`PEER`].
    pub async fn send(&self, mut req: Request<Body>) -> (Response<Body>, Vec<u8>) {
        let peer: SocketAddr = PEER.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(peer));

        let res = self.server.router().oneshot(req).await.unwrap();
        let (parts, body) = res.into_parts();
        let bytes = body.collect().await.unwrap().to_bytes().to_vec();
        (Response::from_parts(parts, Body::empty()), bytes)
    }

    /// Drop the server and wait for every record to reach the sink.
    pub fn finish(self) -> Vec<String> {
        let InProcess { server, writer, sink } = self;
        drop(server);
        writer.join();
        sink.lines()
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}
