//! Prometheus metrics for the relay.
//!
//! Provides metrics collection and a Prometheus-compatible `/metrics` endpoint.

use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

const UPLOADS_TOTAL: &str = "flow2code_uploads_total";
const GENERATION_DURATION: &str = "flow2code_generation_duration_seconds";
const UPLOAD_BYTES: &str = "flow2code_upload_bytes";

/// Initialize metrics and return the Prometheus handle.
///
/// # Errors
///
/// Returns an error if the Prometheus recorder cannot be installed
/// (e.g., if another recorder is already installed).
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Record a finished upload.
///
/// * `outcome` - "success", "rejected" or "failed"
pub fn record_upload(outcome: &str) {
    counter!(UPLOADS_TOTAL, "outcome" => outcome.to_string()).increment(1);
}

/// Record a call to the generation API.
pub fn record_generation(duration: Duration, success: bool) {
    histogram!(GENERATION_DURATION, "success" => success.to_string())
        .record(duration.as_secs_f64());
}

/// Record the size of a staged upload.
#[allow(clippy::cast_precision_loss)]
pub fn record_upload_size(bytes: usize) {
    histogram!(UPLOAD_BYTES).record(bytes as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_upload("success");
        record_generation(Duration::from_millis(12), true);
        record_upload_size(1024);
    }
}
