//! Log-tail endpoint.
//!
//! Serves the last few KiB of the fingerprint log for quick inspection.
//! The first line of the window is dropped because it is usually cut in
//! half by the byte offset.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::http::error::BeaconError;
use crate::http::server::AppState;
use crate::security::apply_no_cache;

/// Where the tail route reads from.
#[derive(Debug, Clone)]
pub struct LogTail {
    pub path: Arc<PathBuf>,
    pub max_bytes: u64,
}

/// Errors reading the log tail.
#[derive(Debug, Error)]
pub enum LogTailError {
    #[error("cannot access log file: {0}")]
    Open(#[source] std::io::Error),

    #[error("cannot read log file: {0}")]
    Read(#[source] std::io::Error),
}

/// Read at most `max_bytes` from the end of `path`, minus the first line.
pub async fn read_tail(path: &Path, max_bytes: u64) -> Result<Vec<u8>, LogTailError> {
    let mut file = tokio::fs::File::open(path).await.map_err(LogTailError::Open)?;
    let len = file.metadata().await.map_err(LogTailError::Open)?.len();
    let start = len.saturating_sub(max_bytes);

    file.seek(SeekFrom::Start(start))
        .await
        .map_err(LogTailError::Read)?;

    let mut window = Vec::with_capacity((len - start) as usize);
    file.take(max_bytes)
        .read_to_end(&mut window)
        .await
        .map_err(LogTailError::Read)?;

    Ok(drop_first_line(window))
}

/// Everything after the first `\n`, with NUL bytes removed.
fn drop_first_line(window: Vec<u8>) -> Vec<u8> {
    let mut rest = match window.iter().position(|b| *b == b'\n') {
        Some(i) => window[i + 1..].to_vec(),
        None => Vec::new(),
    };
    rest.retain(|b| *b != 0);
    rest
}

/// `<logs_path>`, any method.
pub async fn tail_logs(State(state): State<AppState>) -> Result<Response, BeaconError> {
    let Some(tail) = state.log_tail.as_ref() else {
        return Err(BeaconError::NotFound);
    };

    let body = read_tail(&tail.path, tail.max_bytes).await?;
    let mut response = (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response();
    apply_no_cache(response.headers_mut());
    Ok(response)
}
