//! Telemetry event entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

use crate::domain::unit::Unit;

// ============================================================================
// EventId
// ============================================================================

/// Identifier generated for every accepted event
///
/// Generation never looks at the event content, so resubmitting an identical
/// event yields a different id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// RawEvent
// ============================================================================

/// An event exactly as submitted, before validation
///
/// Every field is kept loosely typed so that the validator, not the JSON
/// decoder, decides what is wrong and can report all failing fields at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub event_type: Option<Value>,
    #[serde(default)]
    pub unit_type: Option<Value>,
    #[serde(default)]
    pub unit_id: Option<Value>,
    #[serde(default, alias = "experiment_exposures")]
    pub experiments: Option<Value>,
    #[serde(default)]
    pub context: Option<Value>,
    #[serde(default)]
    pub metrics: Option<Value>,
    #[serde(default)]
    pub payload: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
}

// ============================================================================
// Event
// ============================================================================

/// Reference to the variant a unit was exposed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentExposure {
    pub experiment_id: String,
    pub variant_id: String,
}

/// A validated, normalized event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub event_id: EventId,
    pub event_type: String,
    pub unit: Unit,
    pub experiment_exposures: Vec<ExperimentExposure>,
    pub context: Map<String, Value>,
    pub metrics: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, Value>>,
    pub timestamp: DateTime<Utc>,
    pub received_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_ids_are_unique() {
        assert_ne!(EventId::generate(), EventId::generate());
    }

    #[test]
    fn test_event_id_serializes_as_string() {
        let id = EventId::generate();
        assert_eq!(serde_json::to_value(id).unwrap(), json!(id.to_string()));
    }

    #[test]
    fn test_raw_event_accepts_exposure_alias() {
        let raw: RawEvent = serde_json::from_value(json!({
            "event_type": "plan_generated",
            "experiment_exposures": [{"experiment_id": "e", "variant_id": "v"}]
        }))
        .unwrap();

        assert!(raw.experiments.is_some());
        assert!(raw.unit_id.is_none());
    }

    #[test]
    fn test_raw_event_keeps_wrong_types_for_validation() {
        let raw: RawEvent = serde_json::from_value(json!({
            "event_type": 42,
            "unit_type": ["user"],
            "timestamp": false
        }))
        .unwrap();

        assert_eq!(raw.event_type, Some(json!(42)));
        assert_eq!(raw.timestamp, Some(json!(false)));
    }
}
