//! # Flow2Code Relay
//!
//! Accepts an uploaded flowchart image and a target language, forwards them to
//! a code-generation API, and returns the generated code.
//!
//! This library is used by both the binary and integration tests.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod config;
pub mod error;
pub mod generation;
pub mod health;
pub mod metrics;
pub mod routes;

pub use config::{ConfigError, RelayConfig};
pub use error::{RelayError, RelayResult};
pub use generation::{CodeGenerator, GenerationError, GenerationRequest, OpenAiGenerator};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Backend that turns images into code.
    pub generator: Arc<dyn CodeGenerator>,
    /// Relay configuration.
    pub config: Arc<RelayConfig>,
}

impl AppState {
    /// Create state from a configuration and a generator.
    #[must_use]
    pub fn new(config: RelayConfig, generator: Arc<dyn CodeGenerator>) -> Self {
        Self {
            generator,
            config: Arc::new(config),
        }
    }
}

/// Build a CORS layer that only allows localhost origins.
#[must_use]
pub fn build_cors_layer(port: u16) -> CorsLayer {
    let localhost_origins = [
        format!("http://localhost:{port}"),
        format!("http://127.0.0.1:{port}"),
        // Frontend dev servers
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(), // Vite
        "http://127.0.0.1:3000".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ];

    let origins: Vec<HeaderValue> = localhost_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Build the relay router: banner, health checks and `/upload`.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let port = state.config.port;
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(health::root))
        .route("/health/live", get(health::liveness))
        .route("/health", get(health::readiness))
        .route("/upload", post(routes::upload))
        .layer(DefaultBodyLimit::max(body_limit))
        // Request ID for log correlation
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(build_cors_layer(port))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
