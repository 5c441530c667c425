//! Event ingestion endpoint handlers

use axum::{extract::State, http::StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::api::middleware::BearerToken;
use crate::api::state::AppState;
use crate::api::types::{ApiError, BatchRequest, BatchResponse, EventResponse, Json};
use crate::domain::BatchStatus;

/// POST /api/v1/events
pub async fn create_event(
    State(state): State<AppState>,
    BearerToken(_token): BearerToken,
    Json(event): Json<Value>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = state.ingestion_service.ingest(event)?;

    Ok(Json(EventResponse::accepted(event.event_id)))
}

/// POST /api/v1/events/batch
///
/// 200 when every item was accepted, 207 Multi-Status as soon as one item
/// was rejected. A body without an `events` list is rejected as a whole.
pub async fn create_event_batch(
    State(state): State<AppState>,
    BearerToken(_token): BearerToken,
    Json(request): Json<BatchRequest>,
) -> Result<(StatusCode, Json<BatchResponse>), ApiError> {
    debug!(batch_size = request.events.len(), "Ingesting event batch");

    let outcome = state
        .ingestion_service
        .ingest_batch(request.events)
        .map_err(ApiError::from)?;

    let status = match outcome.status() {
        BatchStatus::Accepted => StatusCode::OK,
        BatchStatus::PartialSuccess => StatusCode::MULTI_STATUS,
    };

    Ok((status, Json(BatchResponse::from(outcome))))
}
