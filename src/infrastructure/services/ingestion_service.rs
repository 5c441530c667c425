//! Event ingestion service
//!
//! Validates single events and batches. Batch items are validated
//! independently so that one bad item never prevents the rest from being
//! accepted.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::event::{
    validate_value, BatchOutcome, Event, EventValidationError,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_event_ingestion;

/// Default upper bound on the number of events in one batch
pub const DEFAULT_MAX_BATCH_SIZE: usize = 1000;

/// Service for ingesting telemetry events
#[derive(Debug, Clone)]
pub struct IngestionService {
    max_batch_size: usize,
}

impl IngestionService {
    /// Create a new ingestion service
    pub fn new(max_batch_size: usize) -> Self {
        Self { max_batch_size }
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Validate and accept one event submitted as raw JSON
    pub fn ingest(&self, item: Value) -> Result<Event, EventValidationError> {
        let result = validate_value(item);

        match &result {
            Ok(event) => {
                record_event_ingestion(1, 0);
                debug!(
                    event_id = %event.event_id,
                    event_type = %event.event_type,
                    unit_type = %event.unit.unit_type,
                    exposures = event.experiment_exposures.len(),
                    "Event accepted"
                );
            }
            Err(e) => {
                record_event_ingestion(0, 1);
                debug!(error = %e, "Event rejected");
            }
        }

        result
    }

    /// Validate every item of a batch, in order
    ///
    /// Item failures are reported inside the outcome. The call itself fails
    /// only when the batch exceeds the configured size, in which case no item
    /// is processed.
    pub fn ingest_batch(&self, items: Vec<Value>) -> Result<BatchOutcome, DomainError> {
        if items.len() > self.max_batch_size {
            warn!(
                batch_size = items.len(),
                max_batch_size = self.max_batch_size,
                "Batch rejected: too many events"
            );
            return Err(DomainError::validation(format!(
                "Batch contains {} events, the maximum is {}",
                items.len(),
                self.max_batch_size
            )));
        }

        let outcome = BatchOutcome::from_results(items.into_iter().map(validate_value));

        record_event_ingestion(outcome.accepted_count as u64, outcome.rejected_count as u64);

        info!(
            accepted = outcome.accepted_count,
            rejected = outcome.rejected_count,
            status = ?outcome.status(),
            "Batch ingested"
        );

        Ok(outcome)
    }
}

impl Default for IngestionService {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BATCH_SIZE)
    }
}
