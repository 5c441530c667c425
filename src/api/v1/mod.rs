//! Versioned API endpoints, mounted under `/api/v1`

pub mod assignments;
pub mod events;

use axum::{routing::post, Router};

use super::state::AppState;

/// Assignment API routes
pub fn create_assignments_router() -> Router<AppState> {
    Router::new().route("/assignments", post(assignments::create_assignments))
}

/// Event ingestion API routes
pub fn create_events_router() -> Router<AppState> {
    Router::new()
        .route("/events", post(events::create_event))
        .route("/events/batch", post(events::create_event_batch))
}

/// Both APIs
pub fn create_v1_router() -> Router<AppState> {
    create_assignments_router().merge(create_events_router())
}
