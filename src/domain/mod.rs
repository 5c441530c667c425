//! Domain layer - Core business logic and entities

pub mod error;
pub mod event;
pub mod experiment;
pub mod unit;

pub use error::DomainError;
pub use event::{
    BatchItemError, BatchOutcome, BatchStatus, Event, EventId, EventValidationError,
    ExperimentExposure, FieldError, RawEvent,
};
pub use experiment::{
    Assignment, AssignmentOutcome, Experiment, ExperimentCatalog, ExperimentId, ExperimentStatus,
    SkipReason, SkippedExperiment, SplitPolicy, SplitRange, Variant, VariantConfig, VariantId,
};
pub use unit::{Unit, UnitType};
