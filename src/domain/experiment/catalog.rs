//! Experiment catalog capability

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::Experiment;
use crate::domain::DomainError;

/// Read-only lookup into the experiment catalog
///
/// The catalog owns experiments and their split policies; this service only
/// reads them. `Ok(None)` means the catalog does not know the name, `Err`
/// means the catalog could not answer.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ExperimentCatalog: Send + Sync {
    /// Find an experiment by its name
    async fn find(&self, name: &str) -> Result<Option<Experiment>, DomainError>;

    /// Number of experiments currently published, used by readiness checks
    async fn count(&self) -> Result<usize, DomainError>;
}
