//! Assignment service
//!
//! Resolves a unit against a list of requested experiments: catalog lookup,
//! bucketing, then variant resolution through the experiment's split policy.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::experiment::{
    Assignment, AssignmentOutcome, Experiment, ExperimentCatalog, SkipReason, Variant,
};
use crate::domain::{DomainError, Unit};
use crate::infrastructure::experiment::ConsistentHasher;
use crate::infrastructure::observability::{record_assignment, record_assignment_skip};

/// Service that assigns units to experiment variants
///
/// Nothing is persisted: the same unit, experiment list and catalog state
/// always produce the same outcome.
#[derive(Clone)]
pub struct AssignmentService {
    catalog: Arc<dyn ExperimentCatalog>,
}

impl AssignmentService {
    /// Create a new assignment service
    pub fn new(catalog: Arc<dyn ExperimentCatalog>) -> Self {
        Self { catalog }
    }

    /// Assign `unit` to each requested experiment, in request order
    ///
    /// Unknown experiments, experiments that are not running and failed or
    /// timed out catalog lookups are reported as skips rather than errors.
    /// The only error is a split policy that cannot place the bucket.
    pub async fn assign(
        &self,
        unit: &Unit,
        requested_experiments: &[String],
    ) -> Result<AssignmentOutcome, DomainError> {
        let mut outcome = AssignmentOutcome::new();

        for name in requested_experiments {
            let experiment = match self.catalog.find(name).await {
                Ok(Some(experiment)) => experiment,
                Ok(None) => {
                    debug!(experiment_name = %name, "Experiment not in catalog");
                    skip(&mut outcome, name, SkipReason::NotFound);
                    continue;
                }
                Err(e) => {
                    warn!(
                        experiment_name = %name,
                        error = %e,
                        "Catalog lookup failed, skipping experiment"
                    );
                    skip(&mut outcome, name, SkipReason::NotFound);
                    continue;
                }
            };

            if !experiment.is_running() {
                debug!(
                    experiment_name = %name,
                    status = %experiment.status(),
                    "Experiment is not running"
                );
                skip(&mut outcome, name, SkipReason::Inactive);
                continue;
            }

            let bucket = ConsistentHasher::bucket(name, &unit.id);
            let variant = resolve_variant(&experiment, bucket)?;

            debug!(
                experiment_id = %experiment.id(),
                variant_id = %variant.id(),
                unit_type = %unit.unit_type,
                unit_id = %unit.id,
                bucket = bucket,
                "Assigned variant to unit"
            );

            record_assignment(experiment.name(), variant.name());
            outcome.assign(Assignment::new(&experiment, variant));
        }

        Ok(outcome)
    }

    /// Number of experiments the catalog currently publishes
    pub async fn catalog_size(&self) -> Result<usize, DomainError> {
        self.catalog.count().await
    }
}

fn skip(outcome: &mut AssignmentOutcome, name: &str, reason: SkipReason) {
    record_assignment_skip(reason);
    outcome.skip(name, reason);
}

fn resolve_variant(experiment: &Experiment, bucket: u32) -> Result<&Variant, DomainError> {
    experiment.resolve_variant(bucket).ok_or_else(|| {
        DomainError::configuration(format!(
            "Split policy of experiment '{}' does not cover bucket {}",
            experiment.id(),
            bucket
        ))
    })
}
