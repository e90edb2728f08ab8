//! Relay errors and their HTTP mapping.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::generation::GenerationError;

/// Message returned for every failed generation.
pub const GENERATION_FAILED: &str = "Failed to generate code";

/// Result type for relay handlers.
pub type RelayResult<T> = std::result::Result<T, RelayError>;

/// Errors surfaced by the `/upload` handler.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The multipart body had no `flowchart` file.
    #[error("No flowchart file uploaded")]
    MissingFile,
    /// The multipart body could not be read.
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),
    /// The request body exceeded the configured limit.
    #[error("Upload exceeds the maximum allowed size")]
    PayloadTooLarge,
    /// The upload could not be staged on disk.
    #[error("failed to stage upload: {0}")]
    Storage(#[from] std::io::Error),
    /// The generation backend failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl RelayError {
    /// HTTP status for this error. Every relay failure answers the same way.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Message shown to the client. The detail only goes to the log.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn public_message(&self) -> &'static str {
        GENERATION_FAILED
    }

    /// Whether the failure was caused by the request rather than the relay.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::MissingFile | Self::InvalidUpload(_) | Self::PayloadTooLarge
        )
    }
}

impl From<MultipartError> for RelayError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge
        } else {
            Self::InvalidUpload(err.body_text())
        }
    }
}

impl From<MultipartRejection> for RelayError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::InvalidUpload(rejection.body_text())
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable error.
    pub error: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        if self.is_rejection() {
            tracing::warn!(error = %self, "upload rejected");
        } else {
            tracing::error!(error = %self, "upload failed");
        }
        (
            self.status(),
            Json(ErrorBody {
                error: self.public_message().to_string(),
            }),
        )
            .into_response()
    }
}
