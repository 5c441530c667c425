//! Application services

mod assignment_service;
mod ingestion_service;

pub use assignment_service::AssignmentService;
pub use ingestion_service::{IngestionService, DEFAULT_MAX_BATCH_SIZE};
