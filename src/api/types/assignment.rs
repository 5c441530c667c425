//! Assignment API request/response types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::ApiError;
use crate::domain::{Assignment, AssignmentOutcome, SkippedExperiment, Unit, UnitType};

/// Body of `POST /api/v1/assignments`
#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentRequest {
    pub unit_type: String,
    pub unit_id: String,
    /// Caller context; accepted for logging, never used for bucketing
    #[serde(default)]
    pub context: Map<String, Value>,
    pub requested_experiments: Vec<String>,
}

impl AssignmentRequest {
    /// Build the unit being assigned, rejecting unknown unit types
    pub fn unit(&self) -> Result<Unit, ApiError> {
        let unit_type: UnitType = self
            .unit_type
            .parse()
            .map_err(|message: String| ApiError::unprocessable(message).with_param("unit_type"))?;

        Ok(Unit::new(unit_type, self.unit_id.clone()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentResponse {
    pub assignments: Vec<Assignment>,
    pub skipped_experiments: Vec<SkippedExperiment>,
}

impl From<AssignmentOutcome> for AssignmentResponse {
    fn from(outcome: AssignmentOutcome) -> Self {
        Self {
            assignments: outcome.assignments,
            skipped_experiments: outcome.skipped,
        }
    }
}
