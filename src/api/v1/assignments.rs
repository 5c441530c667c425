//! Assignment endpoint handlers

use axum::extract::State;
use tracing::debug;

use crate::api::middleware::BearerToken;
use crate::api::state::AppState;
use crate::api::types::{ApiError, AssignmentRequest, AssignmentResponse, Json};

/// POST /api/v1/assignments
///
/// Unknown or inactive experiments, and experiments the catalog could not
/// resolve in time, come back as skips. The response is a 200 even when
/// every requested experiment was skipped.
pub async fn create_assignments(
    State(state): State<AppState>,
    BearerToken(_token): BearerToken,
    Json(request): Json<AssignmentRequest>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    let unit = request.unit()?;

    debug!(
        unit_type = %unit.unit_type,
        unit_id = %unit.id,
        requested = request.requested_experiments.len(),
        context_keys = request.context.len(),
        "Assigning unit"
    );

    let outcome = state
        .assignment_service
        .assign(&unit, &request.requested_experiments)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(AssignmentResponse::from(outcome)))
}
