//! Health check endpoints.
//!
//! - `/` - Plain-text banner
//! - `/health/live` - Liveness check
//! - `/health` - Readiness with component checks

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

/// Banner returned by `GET /`.
pub const BANNER: &str = "Backend is working!";

/// Health status response.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// Overall status: "healthy" or "degraded"
    pub status: &'static str,
    /// Server version
    pub version: &'static str,
    /// Individual component checks
    pub checks: HealthChecks,
}

/// Individual health checks.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    /// A generation API key is configured
    pub api_key_configured: bool,
    /// Upload directory exists
    pub upload_dir: bool,
}

/// Plain-text banner.
#[tracing::instrument(name = "root")]
pub async fn root() -> &'static str {
    BANNER
}

/// Liveness check - is the server running?
#[tracing::instrument(name = "liveness_check")]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness check.
///
/// Reports `degraded` when uploads would fail, but still answers 200 so the
/// banner and health checks keep working without a credential.
#[tracing::instrument(name = "readiness_check", skip(state))]
pub async fn readiness(State(state): State<AppState>) -> Json<HealthStatus> {
    let api_key_configured = state.config.has_api_key();
    let upload_dir = tokio::fs::metadata(&state.config.upload_dir)
        .await
        .is_ok_and(|m| m.is_dir());

    Json(HealthStatus {
        status: if api_key_configured && upload_dir {
            "healthy"
        } else {
            "degraded"
        },
        version: env!("CARGO_PKG_VERSION"),
        checks: HealthChecks {
            api_key_configured,
            upload_dir,
        },
    })
}
