//! Bucket command - show where a unit lands in an experiment

use std::path::PathBuf;

use clap::Args;

use crate::domain::ExperimentCatalog;
use crate::infrastructure::experiment::{ConsistentHasher, InMemoryExperimentCatalog};

#[derive(Args, Debug, Clone)]
pub struct BucketArgs {
    /// Experiment name, as requested by clients
    #[arg(long)]
    pub experiment: String,

    /// Unit identifier
    #[arg(long)]
    pub unit_id: String,

    /// Catalog file used to resolve the bucket to a variant
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

pub async fn run(args: BucketArgs) -> anyhow::Result<()> {
    println!("{}", describe(&args).await?);
    Ok(())
}

async fn describe(args: &BucketArgs) -> anyhow::Result<String> {
    let bucket = ConsistentHasher::bucket(&args.experiment, &args.unit_id);
    let mut lines = vec![format!("bucket: {}", bucket)];

    if let Some(path) = &args.catalog {
        let catalog = InMemoryExperimentCatalog::from_file(path)?;

        match catalog.find(&args.experiment).await? {
            Some(experiment) => {
                if let Some(description) = experiment.description() {
                    lines.push(format!("description: {}", description));
                }
                lines.push(format!("status: {}", experiment.status()));

                if let Some(variant) = experiment.resolve_variant(bucket) {
                    lines.push(format!("variant: {} ({})", variant.name(), variant.id()));
                }
            }
            None => lines.push("experiment not found in catalog".to_string()),
        }
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_describe_without_catalog() {
        let args = BucketArgs {
            experiment: "test_exp".to_string(),
            unit_id: "user-123".to_string(),
            catalog: None,
        };

        assert_eq!(describe(&args).await.unwrap(), "bucket: 4705");
    }

    #[tokio::test]
    async fn test_describe_with_catalog() {
        let path = std::env::temp_dir().join(format!(
            "bucket-cli-{}.json",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(
            &path,
            r#"{"experiments": [{
                "id": "planner_policy_exp",
                "name": "planner_policy_exp",
                "description": "Planner policy rollout",
                "status": "active",
                "split": [
                    {"upper_bound": 5000, "variant": {"id": "control", "name": "control"}},
                    {"upper_bound": 10000, "variant": {"id": "treatment", "name": "treatment"}}
                ]
            }]}"#,
        )
        .unwrap();

        let args = BucketArgs {
            experiment: "planner_policy_exp".to_string(),
            unit_id: "user-123".to_string(),
            catalog: Some(path.clone()),
        };
        let output = describe(&args).await;
        std::fs::remove_file(&path).ok();

        let output = output.unwrap();
        assert!(output.contains("bucket: 7962"));
        assert!(output.contains("description: Planner policy rollout"));
        assert!(output.contains("variant: treatment (treatment)"));
    }
}
