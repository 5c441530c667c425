//! Catalog decorator that bounds every lookup with a timeout

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::domain::experiment::{Experiment, ExperimentCatalog};
use crate::domain::DomainError;

/// Wraps a catalog so that a slow lookup becomes `CatalogUnavailable`
/// instead of blocking the request
#[derive(Clone)]
pub struct TimeoutCatalog {
    inner: Arc<dyn ExperimentCatalog>,
    timeout: Duration,
}

impl TimeoutCatalog {
    pub fn new(inner: Arc<dyn ExperimentCatalog>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for TimeoutCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeoutCatalog")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ExperimentCatalog for TimeoutCatalog {
    async fn find(&self, name: &str) -> Result<Option<Experiment>, DomainError> {
        match tokio::time::timeout(self.timeout, self.inner.find(name)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    experiment_name = %name,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Catalog lookup timed out"
                );
                Err(DomainError::catalog_unavailable(format!(
                    "lookup of '{}' timed out after {}ms",
                    name,
                    self.timeout.as_millis()
                )))
            }
        }
    }

    async fn count(&self) -> Result<usize, DomainError> {
        tokio::time::timeout(self.timeout, self.inner.count())
            .await
            .map_err(|_| DomainError::catalog_unavailable("count timed out"))?
    }
}
