//! Batch ingestion accounting

use serde::{Deserialize, Serialize};

use super::entity::{Event, EventId};
use super::validation::{EventValidationError, FieldError};

/// A rejected batch item, addressed by its 0-based position in the request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItemError {
    pub index: usize,
    pub error: String,
    pub fields: Vec<FieldError>,
}

impl BatchItemError {
    pub fn new(index: usize, error: &EventValidationError) -> Self {
        Self {
            index,
            error: error.to_string(),
            fields: error.fields.clone(),
        }
    }
}

/// Aggregate status of a processed batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Every item was accepted
    Accepted,
    /// At least one item was rejected; the remaining items were still processed
    PartialSuccess,
}

/// Outcome of ingesting a batch of raw events
///
/// `accepted_count + rejected_count` always equals the number of items
/// recorded, and `event_ids` holds exactly one id per accepted item, in input
/// order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub accepted_count: usize,
    pub rejected_count: usize,
    pub event_ids: Vec<EventId>,
    pub errors: Vec<BatchItemError>,
    #[serde(skip)]
    accepted: Vec<Event>,
}

impl BatchOutcome {
    /// Create an empty outcome
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold per-item results, taken in input order
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = Result<Event, EventValidationError>>,
    {
        let mut outcome = Self::new();

        for (index, result) in results.into_iter().enumerate() {
            outcome.record(index, result);
        }

        outcome
    }

    /// Record the result for the item at `index`
    pub fn record(&mut self, index: usize, result: Result<Event, EventValidationError>) {
        match result {
            Ok(event) => {
                self.accepted_count += 1;
                self.event_ids.push(event.event_id);
                self.accepted.push(event);
            }
            Err(error) => {
                self.rejected_count += 1;
                self.errors.push(BatchItemError::new(index, &error));
            }
        }
    }

    /// Total number of items recorded
    pub fn total(&self) -> usize {
        self.accepted_count + self.rejected_count
    }

    pub fn status(&self) -> BatchStatus {
        if self.rejected_count == 0 {
            BatchStatus::Accepted
        } else {
            BatchStatus::PartialSuccess
        }
    }

    /// The accepted events, in input order
    pub fn accepted_events(&self) -> &[Event] {
        &self.accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::validate_value;
    use serde_json::{json, Value};

    fn valid(unit_id: &str) -> Value {
        json!({
            "event_type": "e1",
            "unit_type": "user",
            "unit_id": unit_id,
            "timestamp": "2025-01-01T10:00:00Z"
        })
    }

    fn invalid() -> Value {
        json!({
            "event_type": "e1",
            "unit_type": "invalid",
            "unit_id": "u",
            "timestamp": "2025-01-01T10:00:00Z"
        })
    }

    fn ingest(items: Vec<Value>) -> BatchOutcome {
        BatchOutcome::from_results(items.into_iter().map(validate_value))
    }

    #[test]
    fn test_fault_isolation() {
        let outcome = ingest(vec![valid("u1"), invalid(), valid("u3")]);

        assert_eq!(outcome.accepted_count, 2);
        assert_eq!(outcome.rejected_count, 1);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].index, 1);
        assert_eq!(outcome.errors[0].fields[0].field, "unit_type");
        assert_eq!(outcome.status(), BatchStatus::PartialSuccess);

        let units: Vec<_> = outcome
            .accepted_events()
            .iter()
            .map(|e| e.unit.id.as_str())
            .collect();
        assert_eq!(units, vec!["u1", "u3"]);
        assert_eq!(outcome.event_ids[0], outcome.accepted_events()[0].event_id);
    }

    #[test]
    fn test_accounting_invariant() {
        let batches = vec![
            vec![],
            vec![valid("a")],
            vec![invalid()],
            vec![invalid(), invalid(), valid("b"), json!("not an object"), valid("c")],
            (0..25).map(|i| if i % 3 == 0 { invalid() } else { valid("x") }).collect(),
        ];

        for batch in batches {
            let n = batch.len();
            let outcome = ingest(batch);

            assert_eq!(outcome.accepted_count + outcome.rejected_count, n);
            assert_eq!(outcome.total(), n);
            assert_eq!(outcome.event_ids.len(), outcome.accepted_count);
            assert_eq!(outcome.errors.len(), outcome.rejected_count);
        }
    }

    #[test]
    fn test_error_indices_are_ordered() {
        let outcome = ingest(vec![invalid(), valid("a"), json!(null), invalid()]);

        let indices: Vec<_> = outcome.errors.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 2, 3]);
    }

    #[test]
    fn test_all_accepted_status() {
        let outcome = ingest(vec![valid("a"), valid("b")]);
        assert_eq!(outcome.status(), BatchStatus::Accepted);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_all_rejected_is_still_partial_success() {
        let outcome = ingest(vec![invalid(), invalid()]);

        assert_eq!(outcome.accepted_count, 0);
        assert_eq!(outcome.status(), BatchStatus::PartialSuccess);
    }

    #[test]
    fn test_empty_batch() {
        let outcome = ingest(vec![]);

        assert_eq!(outcome.total(), 0);
        assert_eq!(outcome.status(), BatchStatus::Accepted);
    }
}
