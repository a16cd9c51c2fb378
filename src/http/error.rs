//! Request-scoped errors and their HTTP mapping.
//!
//! Clients only ever see a short fixed message. The underlying cause is
//! reported through `tracing`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::fingerprint::SynthesisError;
use crate::http::logs::LogTailError;

pub const NOT_FOUND_BODY: &str = "404 Not Found";

#[derive(Debug, Error)]
pub enum BeaconError {
    #[error("image synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("log tail failed: {0}")]
    LogTail(#[from] LogTailError),

    #[error("not found")]
    NotFound,
}

impl BeaconError {
    fn status_code(&self) -> StatusCode {
        match self {
            BeaconError::Synthesis(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BeaconError::LogTail(_) => StatusCode::BAD_REQUEST,
            BeaconError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            BeaconError::Synthesis(_) => "500 Internal Server Error",
            BeaconError::LogTail(LogTailError::Open(_)) => "400 Error occurred accessing logs",
            BeaconError::LogTail(LogTailError::Read(_)) => "400 Error occurred reading logs",
            BeaconError::NotFound => NOT_FOUND_BODY,
        }
    }
}

impl IntoResponse for BeaconError {
    fn into_response(self) -> Response {
        match &self {
            BeaconError::NotFound => {}
            other => tracing::error!(error = %other, "Request failed"),
        }
        (self.status_code(), self.public_message()).into_response()
    }
}
