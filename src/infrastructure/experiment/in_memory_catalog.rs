//! In-memory experiment catalog, optionally seeded from a catalog file

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use crate::domain::experiment::{Experiment, ExperimentCatalog};
use crate::domain::DomainError;

/// On-disk catalog layout (JSON or TOML)
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    experiments: Vec<Experiment>,
}

/// Read-only catalog held in memory, keyed by experiment name
#[derive(Debug, Default)]
pub struct InMemoryExperimentCatalog {
    experiments: HashMap<String, Experiment>,
}

impl InMemoryExperimentCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog with initial experiments
    ///
    /// Fails if an experiment is invalid or two experiments share a name.
    pub fn with_experiments(experiments: Vec<Experiment>) -> Result<Self, DomainError> {
        let mut map = HashMap::with_capacity(experiments.len());

        for experiment in experiments {
            experiment.validate().map_err(|e| {
                DomainError::configuration(format!(
                    "Experiment '{}' is invalid: {}",
                    experiment.id(),
                    e
                ))
            })?;

            let name = experiment.name().to_string();

            if map.insert(name.clone(), experiment).is_some() {
                return Err(DomainError::configuration(format!(
                    "Experiment name '{}' is defined more than once",
                    name
                )));
            }
        }

        Ok(Self { experiments: map })
    }

    /// Load a catalog file; the format is chosen by extension (`.json` or `.toml`)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DomainError::configuration(format!(
                "Failed to read catalog file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let document = parse_document(path, &contents)?;
        let catalog = Self::with_experiments(document.experiments)?;

        info!(
            path = %path.display(),
            experiments = catalog.experiments.len(),
            "Experiment catalog loaded"
        );

        Ok(catalog)
    }
}

fn parse_document(path: &Path, contents: &str) -> Result<CatalogDocument, DomainError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let parsed = match extension.as_deref() {
        Some("json") => serde_json::from_str(contents).map_err(|e| e.to_string()),
        Some("toml") => toml::from_str(contents).map_err(|e| e.to_string()),
        other => {
            return Err(DomainError::configuration(format!(
                "Unsupported catalog file extension {:?} for '{}'",
                other,
                path.display()
            )));
        }
    };

    parsed.map_err(|e| {
        DomainError::configuration(format!(
            "Invalid catalog file '{}': {}",
            path.display(),
            e
        ))
    })
}

#[async_trait]
impl ExperimentCatalog for InMemoryExperimentCatalog {
    async fn find(&self, name: &str) -> Result<Option<Experiment>, DomainError> {
        let experiment = self.experiments.get(name).cloned();

        debug!(
            experiment_name = %name,
            found = experiment.is_some(),
            "Catalog lookup"
        );

        Ok(experiment)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.experiments.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::experiment::{
        ExperimentId, ExperimentStatus, SplitPolicy, Variant, VariantConfig, VariantId,
    };
    use std::io::Write;

    fn experiment(id: &str, name: &str) -> Experiment {
        Experiment::new(
            ExperimentId::new(id).unwrap(),
            name,
            SplitPolicy::even_split(
                Variant::new(VariantId::new("control").unwrap(), "control", VariantConfig::default()),
                Variant::new(
                    VariantId::new("treatment").unwrap(),
                    "treatment",
                    VariantConfig::default(),
                ),
            ),
        )
    }

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", uuid::Uuid::new_v4(), name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[tokio::test]
    async fn test_find_by_name() {
        let catalog = InMemoryExperimentCatalog::with_experiments(vec![
            experiment("exp-1", "checkout_flow"),
            experiment("exp-2", "planner_policy_exp"),
        ])
        .unwrap();

        let found = catalog.find("planner_policy_exp").await.unwrap().unwrap();
        assert_eq!(found.id().as_str(), "exp-2");

        assert!(catalog.find("exp-2").await.unwrap().is_none());
        assert!(catalog.find("invalid_exp").await.unwrap().is_none());
        assert_eq!(catalog.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let catalog = InMemoryExperimentCatalog::new();

        assert_eq!(catalog.count().await.unwrap(), 0);
        assert!(catalog.find("anything").await.unwrap().is_none());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = InMemoryExperimentCatalog::with_experiments(vec![
            experiment("exp-1", "same"),
            experiment("exp-2", "same"),
        ]);

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_blank_name_rejected() {
        let result = InMemoryExperimentCatalog::with_experiments(vec![experiment("exp-1", "")]);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_load_json_file() {
        let path = write_temp(
            "catalog.json",
            r#"{
                "experiments": [{
                    "id": "exp-planner",
                    "name": "planner_policy_exp",
                    "status": "paused",
                    "split": [
                        {"upper_bound": 5000, "variant": {"id": "control", "name": "control"}},
                        {"upper_bound": 10000, "variant": {"id": "treatment", "name": "treatment"}}
                    ]
                }]
            }"#,
        );

        let catalog = InMemoryExperimentCatalog::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let found = catalog.find("planner_policy_exp").await.unwrap().unwrap();
        assert_eq!(found.status(), ExperimentStatus::Paused);
    }

    #[tokio::test]
    async fn test_load_toml_file() {
        let path = write_temp(
            "catalog.toml",
            r#"
[[experiments]]
id = "exp-planner"
name = "planner_policy_exp"
status = "active"

[[experiments.split]]
upper_bound = 5000
variant = { id = "control", name = "control", config = { execution_strategy = "mlflow_model", mlflow_model = { policy_version_id = "policy-v1", model_name = "planner_model" }, params = { temperature = 0.7 } } }

[[experiments.split]]
upper_bound = 10000
variant = { id = "treatment", name = "treatment" }
"#,
        );

        let catalog = InMemoryExperimentCatalog::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let found = catalog.find("planner_policy_exp").await.unwrap().unwrap();
        let control = found.resolve_variant(0).unwrap();
        assert_eq!(control.config().policy_version_id(), Some("policy-v1"));
    }

    #[test]
    fn test_invalid_split_in_file_rejected() {
        let path = write_temp(
            "catalog.json",
            r#"{"experiments": [{
                "id": "exp-1", "name": "broken", "status": "active",
                "split": [{"upper_bound": 4000, "variant": {"id": "a", "name": "a"}}]
            }]}"#,
        );

        let result = InMemoryExperimentCatalog::from_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = InMemoryExperimentCatalog::from_file("catalog.yaml");
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
