//! PMP Experiment Service
//!
//! Experimentation backend for the meal planner:
//! - Deterministic bucketing of units into experiment variants
//! - Variant assignment against a read-only experiment catalog
//! - Telemetry event ingestion with per-item batch validation

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use api::state::AppState;
use domain::ExperimentCatalog;
use infrastructure::{
    experiment::{InMemoryExperimentCatalog, TimeoutCatalog},
    services::{AssignmentService, IngestionService},
};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
///
/// Loads the catalog file when one is configured. Without one the catalog is
/// empty and every requested experiment is skipped as `not_found`.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let catalog = match &config.catalog.path {
        Some(path) => InMemoryExperimentCatalog::from_file(path)
            .with_context(|| format!("loading experiment catalog from {}", path.display()))?,
        None => {
            warn!("No catalog path configured, starting with an empty experiment catalog");
            InMemoryExperimentCatalog::new()
        }
    };

    Ok(create_app_state_with_catalog(Arc::new(catalog), config))
}

/// Wire services around an existing catalog
pub fn create_app_state_with_catalog(
    catalog: Arc<dyn ExperimentCatalog>,
    config: &AppConfig,
) -> AppState {
    let catalog: Arc<dyn ExperimentCatalog> = Arc::new(TimeoutCatalog::new(
        catalog,
        config.catalog.lookup_timeout(),
    ));

    let assignment_service = Arc::new(AssignmentService::new(catalog));
    let ingestion_service = Arc::new(IngestionService::new(config.ingestion.max_batch_size));

    info!(
        lookup_timeout_ms = config.catalog.lookup_timeout_ms,
        max_batch_size = config.ingestion.max_batch_size,
        require_bearer = config.auth.require_bearer,
        "Application state created"
    );

    AppState::new(assignment_service, ingestion_service, config.auth.clone())
}
