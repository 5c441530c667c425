//! Event domain module
//!
//! Raw and validated telemetry events, the event validator, and the
//! accounting model for partially failing batches.

mod batch;
mod entity;
mod validation;

pub use batch::{BatchItemError, BatchOutcome, BatchStatus};
pub use entity::{Event, EventId, ExperimentExposure, RawEvent};
pub use validation::{validate_event, validate_value, EventValidationError, FieldError};
