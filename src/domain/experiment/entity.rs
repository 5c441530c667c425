//! Experiment domain entities

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use super::split::SplitPolicy;
use super::validation::{
    validate_experiment_id, validate_variant_id, ExperimentValidationError,
};

// ============================================================================
// ExperimentId
// ============================================================================

/// Unique identifier for an experiment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExperimentId(String);

impl ExperimentId {
    /// Create a new experiment ID with validation
    pub fn new(id: impl Into<String>) -> Result<Self, ExperimentValidationError> {
        let id = id.into();
        validate_experiment_id(&id)?;
        Ok(Self(id))
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ExperimentId {
    type Error = ExperimentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExperimentId> for String {
    fn from(id: ExperimentId) -> Self {
        id.0
    }
}

impl fmt::Display for ExperimentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ExperimentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// VariantId
// ============================================================================

/// Unique identifier for a variant within an experiment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VariantId(String);

impl VariantId {
    /// Create a new variant ID with validation
    pub fn new(id: impl Into<String>) -> Result<Self, ExperimentValidationError> {
        let id = id.into();
        validate_variant_id(&id)?;
        Ok(Self(id))
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for VariantId {
    type Error = ExperimentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VariantId> for String {
    fn from(id: VariantId) -> Self {
        id.0
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for VariantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// ExperimentStatus
// ============================================================================

/// Catalog-provided status of an experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentStatus {
    /// Experiment is being configured, not yet running
    Draft,
    /// Experiment is actively running and assigning units
    Active,
    /// Experiment is temporarily paused
    Paused,
    /// Experiment has finished
    Completed,
}

impl ExperimentStatus {
    /// Check if the experiment is currently assigning units
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for ExperimentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Active => write!(f, "active"),
            Self::Paused => write!(f, "paused"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

// ============================================================================
// VariantConfig
// ============================================================================

const EXECUTION_STRATEGY_KEY: &str = "execution_strategy";
const MLFLOW_MODEL_STRATEGY: &str = "mlflow_model";
const PARAMS_KEY: &str = "params";

/// Model reference used by the `mlflow_model` execution strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlflowModelRef {
    pub policy_version_id: String,
    pub model_name: String,
    /// Nested keys such as `registry_uri`, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Typed form of an `mlflow_model` variant configuration
#[derive(Debug, Clone, PartialEq)]
pub struct MlflowModelConfig {
    pub model: MlflowModelRef,
    pub params: Map<String, Value>,
    /// Keys this service does not interpret, kept so the config round-trips verbatim
    pub extra: Map<String, Value>,
}

/// Execution configuration attached to a variant
///
/// Known execution strategies are parsed into typed variants. Anything else,
/// including a known strategy whose shape does not match, is carried as an
/// opaque map so that consumers receive the catalog data unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum VariantConfig {
    MlflowModel(MlflowModelConfig),
    Opaque(Map<String, Value>),
}

impl VariantConfig {
    /// Create an `mlflow_model` config with no parameters
    pub fn mlflow_model(
        policy_version_id: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Self {
        Self::MlflowModel(MlflowModelConfig {
            model: MlflowModelRef {
                policy_version_id: policy_version_id.into(),
                model_name: model_name.into(),
                extra: Map::new(),
            },
            params: Map::new(),
            extra: Map::new(),
        })
    }

    /// Add an execution parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        match &mut self {
            Self::MlflowModel(config) => {
                config.params.insert(key.into(), value.into());
            }
            Self::Opaque(map) => {
                let params = map
                    .entry(PARAMS_KEY)
                    .or_insert_with(|| Value::Object(Map::new()));

                if let Value::Object(params) = params {
                    params.insert(key.into(), value.into());
                }
            }
        }
        self
    }

    /// Interpret a raw catalog map
    pub fn from_map(map: Map<String, Value>) -> Self {
        let strategy = map.get(EXECUTION_STRATEGY_KEY).and_then(Value::as_str);

        if strategy != Some(MLFLOW_MODEL_STRATEGY) {
            return Self::Opaque(map);
        }

        let model = map
            .get(MLFLOW_MODEL_STRATEGY)
            .cloned()
            .and_then(|v| serde_json::from_value::<MlflowModelRef>(v).ok());

        let params = match map.get(PARAMS_KEY) {
            None => Some(Map::new()),
            Some(Value::Object(params)) => Some(params.clone()),
            Some(_) => None,
        };

        match (model, params) {
            (Some(model), Some(params)) => {
                let extra = map
                    .into_iter()
                    .filter(|(k, _)| {
                        k != EXECUTION_STRATEGY_KEY && k != MLFLOW_MODEL_STRATEGY && k != PARAMS_KEY
                    })
                    .collect();

                Self::MlflowModel(MlflowModelConfig {
                    model,
                    params,
                    extra,
                })
            }
            _ => Self::Opaque(map),
        }
    }

    /// Render back to the catalog's map representation
    pub fn to_map(&self) -> Map<String, Value> {
        match self {
            Self::MlflowModel(config) => {
                let mut map = config.extra.clone();
                map.insert(
                    EXECUTION_STRATEGY_KEY.to_string(),
                    Value::String(MLFLOW_MODEL_STRATEGY.to_string()),
                );
                let mut model = config.model.extra.clone();
                model.insert(
                    "policy_version_id".to_string(),
                    Value::String(config.model.policy_version_id.clone()),
                );
                model.insert(
                    "model_name".to_string(),
                    Value::String(config.model.model_name.clone()),
                );
                map.insert(MLFLOW_MODEL_STRATEGY.to_string(), Value::Object(model));
                map.insert(PARAMS_KEY.to_string(), Value::Object(config.params.clone()));
                map
            }
            Self::Opaque(map) => map.clone(),
        }
    }

    /// Get the execution strategy name, if the config declares one
    pub fn execution_strategy(&self) -> Option<&str> {
        match self {
            Self::MlflowModel(_) => Some(MLFLOW_MODEL_STRATEGY),
            Self::Opaque(map) => map.get(EXECUTION_STRATEGY_KEY).and_then(Value::as_str),
        }
    }

    /// Get the referenced policy version, for strategies that have one
    pub fn policy_version_id(&self) -> Option<&str> {
        match self {
            Self::MlflowModel(config) => Some(&config.model.policy_version_id),
            Self::Opaque(_) => None,
        }
    }

    /// Check if the config was understood as a known strategy
    pub fn is_opaque(&self) -> bool {
        matches!(self, Self::Opaque(_))
    }
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self::Opaque(Map::new())
    }
}

impl Serialize for VariantConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VariantConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(Self::from_map)
    }
}

// ============================================================================
// Variant
// ============================================================================

/// One arm of an experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    id: VariantId,
    name: String,
    #[serde(default)]
    config: VariantConfig,
}

impl Variant {
    /// Create a new variant
    pub fn new(id: VariantId, name: impl Into<String>, config: VariantConfig) -> Self {
        Self {
            id,
            name: name.into(),
            config,
        }
    }

    /// Get the variant ID
    pub fn id(&self) -> &VariantId {
        &self.id
    }

    /// Get the variant name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the variant configuration
    pub fn config(&self) -> &VariantConfig {
        &self.config
    }
}

// ============================================================================
// Experiment
// ============================================================================

/// An experiment as published by the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    id: ExperimentId,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    status: ExperimentStatus,
    split: SplitPolicy,
}

impl Experiment {
    /// Create a new active experiment
    pub fn new(id: ExperimentId, name: impl Into<String>, split: SplitPolicy) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            status: ExperimentStatus::Active,
            split,
        }
    }

    // Builder methods

    /// Set the status
    pub fn with_status(mut self, status: ExperimentStatus) -> Self {
        self.status = status;
        self
    }

    // Getters

    /// Get the experiment ID
    pub fn id(&self) -> &ExperimentId {
        &self.id
    }

    /// Get the experiment name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Get the current status
    pub fn status(&self) -> ExperimentStatus {
        self.status
    }

    /// Get the split policy
    pub fn split(&self) -> &SplitPolicy {
        &self.split
    }

    /// Check if units can currently be assigned
    pub fn is_running(&self) -> bool {
        self.status.is_running()
    }

    /// Resolve the variant for a bucket value
    pub fn resolve_variant(&self, bucket: u32) -> Option<&Variant> {
        self.split.resolve(bucket)
    }

    /// Check invariants the type system does not already enforce
    pub fn validate(&self) -> Result<(), ExperimentValidationError> {
        if self.name.trim().is_empty() {
            return Err(ExperimentValidationError::EmptyName);
        }

        Ok(())
    }
}
