//! Observability infrastructure - Metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    create_metrics_router, init_metrics, record_assignment, record_assignment_skip,
    record_event_ingestion, record_http_request, PrometheusMetrics,
};
