//! Experiment validation utilities

use thiserror::Error;

/// Maximum length for experiment IDs
pub const MAX_EXPERIMENT_ID_LENGTH: usize = 64;

/// Maximum length for variant IDs
pub const MAX_VARIANT_ID_LENGTH: usize = 64;

/// Validation errors for experiments, variants and split policies
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExperimentValidationError {
    #[error("Experiment ID cannot be empty")]
    EmptyId,

    #[error("Experiment ID exceeds maximum length of {0} characters")]
    IdTooLong(usize),

    #[error("Experiment ID contains invalid character: '{0}'")]
    InvalidIdCharacter(char),

    #[error("Experiment name cannot be empty")]
    EmptyName,

    #[error("Variant ID cannot be empty")]
    EmptyVariantId,

    #[error("Variant ID exceeds maximum length of {0} characters")]
    VariantIdTooLong(usize),

    #[error("Variant ID contains invalid character: '{0}'")]
    InvalidVariantIdCharacter(char),

    #[error("Split policy must contain at least one range")]
    EmptySplit,

    #[error("Split upper bounds must be strictly increasing ({previous} then {current})")]
    NonIncreasingBoundary { previous: u32, current: u32 },

    #[error("Split upper bound {0} exceeds the bucket space of {1}")]
    BoundaryOutOfRange(u32, u32),

    #[error("Split policy must end at {expected}, ends at {actual}")]
    IncompleteCoverage { expected: u32, actual: u32 },

    #[error("Duplicate variant ID in split: '{0}'")]
    DuplicateVariantId(String),
}

/// Validate an experiment ID
pub fn validate_experiment_id(id: &str) -> Result<(), ExperimentValidationError> {
    if id.is_empty() {
        return Err(ExperimentValidationError::EmptyId);
    }

    if id.len() > MAX_EXPERIMENT_ID_LENGTH {
        return Err(ExperimentValidationError::IdTooLong(MAX_EXPERIMENT_ID_LENGTH));
    }

    if let Some(ch) = id.chars().find(|ch| !is_id_char(*ch)) {
        return Err(ExperimentValidationError::InvalidIdCharacter(ch));
    }

    Ok(())
}

/// Validate a variant ID
pub fn validate_variant_id(id: &str) -> Result<(), ExperimentValidationError> {
    if id.is_empty() {
        return Err(ExperimentValidationError::EmptyVariantId);
    }

    if id.len() > MAX_VARIANT_ID_LENGTH {
        return Err(ExperimentValidationError::VariantIdTooLong(
            MAX_VARIANT_ID_LENGTH,
        ));
    }

    if let Some(ch) = id.chars().find(|ch| !is_id_char(*ch)) {
        return Err(ExperimentValidationError::InvalidVariantIdCharacter(ch));
    }

    Ok(())
}

// Catalog ids are commonly UUIDs or slugs
fn is_id_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}
