use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::v1;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Which APIs a router exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiSurface {
    /// Assignment and event ingestion APIs together
    All,
    Assignments,
    Events,
}

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    create_router_for(state, ApiSurface::All)
}

/// Create a router exposing only `surface`, plus the health endpoints
pub fn create_router_for(state: AppState, surface: ApiSurface) -> Router {
    let api = match surface {
        ApiSurface::All => v1::create_v1_router(),
        ApiSurface::Assignments => v1::create_assignments_router(),
        ApiSurface::Events => v1::create_events_router(),
    };

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/api/v1", api)
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

/// Mount the Prometheus endpoint when metrics are enabled
pub fn with_metrics(router: Router, metrics: Option<PrometheusMetrics>, path: &str) -> Router {
    match metrics {
        Some(m) => router.merge(create_metrics_router(m, path)),
        None => router,
    }
}
