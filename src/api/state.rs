//! Application state for shared services

use std::sync::Arc;

use serde_json::Value;

use crate::config::AuthConfig;
use crate::domain::{
    AssignmentOutcome, BatchOutcome, DomainError, Event, EventValidationError, Unit,
};
use crate::infrastructure::services::{AssignmentService, IngestionService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub assignment_service: Arc<dyn AssignmentServiceTrait>,
    pub ingestion_service: Arc<dyn IngestionServiceTrait>,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(
        assignment_service: Arc<dyn AssignmentServiceTrait>,
        ingestion_service: Arc<dyn IngestionServiceTrait>,
        auth: AuthConfig,
    ) -> Self {
        Self {
            assignment_service,
            ingestion_service,
            auth,
        }
    }
}

/// Trait for assignment operations
#[async_trait::async_trait]
pub trait AssignmentServiceTrait: Send + Sync {
    async fn assign(
        &self,
        unit: &Unit,
        requested_experiments: &[String],
    ) -> Result<AssignmentOutcome, DomainError>;
    async fn catalog_size(&self) -> Result<usize, DomainError>;
}

/// Trait for event ingestion operations
pub trait IngestionServiceTrait: Send + Sync {
    fn ingest(&self, item: Value) -> Result<Event, EventValidationError>;
    fn ingest_batch(&self, items: Vec<Value>) -> Result<BatchOutcome, DomainError>;
}

#[async_trait::async_trait]
impl AssignmentServiceTrait for AssignmentService {
    async fn assign(
        &self,
        unit: &Unit,
        requested_experiments: &[String],
    ) -> Result<AssignmentOutcome, DomainError> {
        AssignmentService::assign(self, unit, requested_experiments).await
    }

    async fn catalog_size(&self) -> Result<usize, DomainError> {
        AssignmentService::catalog_size(self).await
    }
}

impl IngestionServiceTrait for IngestionService {
    fn ingest(&self, item: Value) -> Result<Event, EventValidationError> {
        IngestionService::ingest(self, item)
    }

    fn ingest_batch(&self, items: Vec<Value>) -> Result<BatchOutcome, DomainError> {
        IngestionService::ingest_batch(self, items)
    }
}
