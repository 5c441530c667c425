//! Assignment output types

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entity::{Experiment, Variant, VariantConfig};

/// A unit's resolved variant for one requested experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub experiment_id: String,
    pub experiment_name: String,
    pub variant_id: String,
    pub variant_name: String,
    pub config: VariantConfig,
}

impl Assignment {
    pub fn new(experiment: &Experiment, variant: &Variant) -> Self {
        Self {
            experiment_id: experiment.id().as_str().to_string(),
            experiment_name: experiment.name().to_string(),
            variant_id: variant.id().as_str().to_string(),
            variant_name: variant.name().to_string(),
            config: variant.config().clone(),
        }
    }
}

/// Why a requested experiment produced no assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Unknown to the catalog, or the catalog could not answer in time
    NotFound,
    /// Known to the catalog but not currently running
    Inactive,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedExperiment {
    pub experiment_name: String,
    pub reason: SkipReason,
}

impl SkippedExperiment {
    pub fn new(experiment_name: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            experiment_name: experiment_name.into(),
            reason,
        }
    }
}

/// Result of assigning one unit to a list of requested experiments
///
/// Both lists keep the relative order of the requested names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentOutcome {
    pub assignments: Vec<Assignment>,
    pub skipped: Vec<SkippedExperiment>,
}

impl AssignmentOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    pub fn skip(&mut self, experiment_name: impl Into<String>, reason: SkipReason) {
        self.skipped
            .push(SkippedExperiment::new(experiment_name, reason));
    }

    /// Number of requested experiments accounted for
    pub fn total(&self) -> usize {
        self.assignments.len() + self.skipped.len()
    }
}
