//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use super::config::MetricsConfig;
use crate::domain::experiment::SkipReason;

static UUID_SEGMENT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}").unwrap()
});

static NUMERIC_SEGMENT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d+(/|$)").unwrap());

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
///
/// Without an installed recorder every `record_*` call is a no-op.
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("experiment_service_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record a successful variant assignment
pub fn record_assignment(experiment: &str, variant: &str) {
    counter!(
        "assignments_total",
        "experiment" => experiment.to_string(),
        "variant" => variant.to_string()
    )
    .increment(1);
}

/// Record a requested experiment that was skipped
pub fn record_assignment_skip(reason: SkipReason) {
    counter!("assignment_skips_total", "reason" => reason.as_str()).increment(1);
}

/// Record accepted and rejected events
pub fn record_event_ingestion(accepted: u64, rejected: u64) {
    if accepted > 0 {
        counter!("events_accepted_total").increment(accepted);
    }

    if rejected > 0 {
        counter!("events_rejected_total").increment(rejected);
    }
}

/// Sanitize URL path for metric labels (remove IDs, limit cardinality)
fn sanitize_path(path: &str) -> String {
    let path = UUID_SEGMENT_PATTERN.replace_all(path, "{id}");
    let path = NUMERIC_SEGMENT_PATTERN.replace_all(&path, "/{id}$1");

    if path.len() > 50 {
        path.chars().take(50).collect()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_uuid() {
        let path = "/api/v1/events/550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(sanitize_path(path), "/api/v1/events/{id}");
    }

    #[test]
    fn test_sanitize_path_numeric_id() {
        assert_eq!(sanitize_path("/api/units/123/events"), "/api/units/{id}/events");
    }

    #[test]
    fn test_sanitize_path_mixed_ids() {
        let path = "/api/units/42/events/550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(sanitize_path(path), "/api/units/{id}/events/{id}");
    }

    #[test]
    fn test_sanitize_path_no_id() {
        assert_eq!(sanitize_path("/api/v1/events/batch"), "/api/v1/events/batch");
    }

    #[test]
    fn test_sanitize_path_truncates_long_paths() {
        let path = "/very/long/path/that/exceeds/the/maximum/allowed/length/for/metrics";
        assert!(sanitize_path(path).len() <= 50);
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_assignment("exp", "control");
        record_assignment_skip(SkipReason::Inactive);
        record_event_ingestion(2, 1);
        record_http_request("POST", "/api/v1/events", 200, Duration::from_millis(3));
    }
}
