//! Event ingestion API request/response types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{BatchItemError, BatchOutcome, EventId};

/// Status reported for an accepted single event
pub const ACCEPTED: &str = "accepted";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResponse {
    pub event_id: EventId,
    pub status: String,
}

impl EventResponse {
    pub fn accepted(event_id: EventId) -> Self {
        Self {
            event_id,
            status: ACCEPTED.to_string(),
        }
    }
}

/// Body of `POST /api/v1/events/batch`
///
/// Items stay untyped so that one malformed item is reported against its
/// index instead of failing the whole request.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    pub events: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub accepted: usize,
    pub rejected: usize,
    pub event_ids: Vec<EventId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<BatchItemError>>,
}

impl From<BatchOutcome> for BatchResponse {
    fn from(outcome: BatchOutcome) -> Self {
        let errors = if outcome.errors.is_empty() {
            None
        } else {
            Some(outcome.errors)
        };

        Self {
            accepted: outcome.accepted_count,
            rejected: outcome.rejected_count,
            event_ids: outcome.event_ids,
            errors,
        }
    }
}
