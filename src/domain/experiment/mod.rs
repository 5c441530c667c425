//! Experiment domain module for A/B testing
//!
//! Types for catalog experiments, split policies and the assignments
//! produced from them.

mod assignment;
mod catalog;
mod entity;
mod split;
mod validation;

pub use assignment::{Assignment, AssignmentOutcome, SkipReason, SkippedExperiment};
pub use catalog::ExperimentCatalog;
pub use entity::{
    Experiment, ExperimentId, ExperimentStatus, MlflowModelConfig, MlflowModelRef, Variant,
    VariantConfig, VariantId,
};
pub use split::{SplitPolicy, SplitRange, BUCKET_SPACE};
pub use validation::ExperimentValidationError;

#[cfg(test)]
pub use catalog::MockExperimentCatalog;
