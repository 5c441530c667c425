//! Event validation

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::entity::{Event, EventId, ExperimentExposure, RawEvent};
use crate::domain::unit::{Unit, UnitType};

/// Naive timestamp layouts accepted as UTC
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// One failing field of a raw event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A raw event failed validation; lists every failing field
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid event: {}", describe(.fields))]
pub struct EventValidationError {
    pub fields: Vec<FieldError>,
}

impl EventValidationError {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            fields: vec![FieldError::new(field, message)],
        }
    }

    /// Names of the failing fields, in check order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.field.as_str()).collect()
    }
}

fn describe(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate an untyped JSON value as an event
///
/// Used for batch items, where a single item may not even be an object.
pub fn validate_value(value: Value) -> Result<Event, EventValidationError> {
    if !value.is_object() {
        return Err(EventValidationError::single(
            "event",
            "must be a JSON object",
        ));
    }

    let raw: RawEvent = serde_json::from_value(value)
        .map_err(|e| EventValidationError::single("event", e.to_string()))?;

    validate_event(raw)
}

/// Validate a raw event and normalize it, generating a fresh event id
pub fn validate_event(raw: RawEvent) -> Result<Event, EventValidationError> {
    let mut errors = Vec::new();

    let event_type = required_string(&raw.event_type, "event_type", &mut errors);
    let unit_type = parse_unit_type(&raw.unit_type, &mut errors);
    let unit_id = required_string(&raw.unit_id, "unit_id", &mut errors);
    let experiment_exposures = parse_exposures(&raw.experiments, &mut errors);
    let context = optional_object(&raw.context, "context", &mut errors);
    let metrics = optional_object(&raw.metrics, "metrics", &mut errors);
    let payload = parse_payload(&raw.payload, &mut errors);
    let timestamp = parse_timestamp(&raw.timestamp, &mut errors);

    match (event_type, unit_type, unit_id, timestamp) {
        (Some(event_type), Some(unit_type), Some(unit_id), Some(timestamp))
            if errors.is_empty() =>
        {
            Ok(Event {
                event_id: EventId::generate(),
                event_type,
                unit: Unit::new(unit_type, unit_id),
                experiment_exposures,
                context: context.unwrap_or_default(),
                metrics: metrics.unwrap_or_default(),
                payload,
                timestamp,
                received_at: Utc::now(),
            })
        }
        _ => Err(EventValidationError { fields: errors }),
    }
}

fn required_string(
    value: &Option<Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(field, "field required"));
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            errors.push(FieldError::new(field, "must be a non-empty string"));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(field, "must be a string"));
            None
        }
    }
}

fn parse_unit_type(value: &Option<Value>, errors: &mut Vec<FieldError>) -> Option<UnitType> {
    let raw = required_string(value, "unit_type", errors)?;

    match raw.parse::<UnitType>() {
        Ok(unit_type) => Some(unit_type),
        Err(message) => {
            errors.push(FieldError::new("unit_type", message));
            None
        }
    }
}

fn parse_exposures(
    value: &Option<Value>,
    errors: &mut Vec<FieldError>,
) -> Vec<ExperimentExposure> {
    let items = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            errors.push(FieldError::new("experiments", "must be a list"));
            return Vec::new();
        }
    };

    let mut exposures = Vec::with_capacity(items.len());

    for (idx, item) in items.iter().enumerate() {
        let Some(obj) = item.as_object() else {
            errors.push(FieldError::new(
                format!("experiments[{}]", idx),
                "must be an object",
            ));
            continue;
        };

        let experiment_id = required_string(
            &obj.get("experiment_id").cloned(),
            &format!("experiments[{}].experiment_id", idx),
            errors,
        );
        let variant_id = required_string(
            &obj.get("variant_id").cloned(),
            &format!("experiments[{}].variant_id", idx),
            errors,
        );

        if let (Some(experiment_id), Some(variant_id)) = (experiment_id, variant_id) {
            exposures.push(ExperimentExposure {
                experiment_id,
                variant_id,
            });
        }
    }

    exposures
}

fn optional_object(
    value: &Option<Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<Map<String, Value>> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map.clone()),
        Some(_) => {
            errors.push(FieldError::new(field, "must be an object"));
            None
        }
    }
}

fn parse_payload(
    value: &Option<Value>,
    errors: &mut Vec<FieldError>,
) -> Option<Map<String, Value>> {
    optional_object(value, "payload", errors)
}

fn parse_timestamp(value: &Option<Value>, errors: &mut Vec<FieldError>) -> Option<DateTime<Utc>> {
    let parsed = match value {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("timestamp", "field required"));
            return None;
        }
        Some(Value::String(s)) => parse_timestamp_str(s.trim()),
        Some(Value::Number(n)) => parse_epoch_seconds(n),
        Some(_) => None,
    };

    if parsed.is_none() {
        errors.push(FieldError::new(
            "timestamp",
            "must be an RFC 3339 / ISO 8601 datetime or Unix epoch seconds",
        ));
    }

    parsed
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn parse_epoch_seconds(n: &serde_json::Number) -> Option<DateTime<Utc>> {
    if let Some(secs) = n.as_i64() {
        return DateTime::from_timestamp(secs, 0);
    }

    let secs = n.as_f64()?;

    if !secs.is_finite() {
        return None;
    }

    let whole = secs.floor();
    let nanos = ((secs - whole) * 1_000_000_000.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}
