//! YAML schema definitions for declarative training configuration

use super::runtime::RuntimeConfig;
use crate::autograd::Precision;
use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a bool from either a YAML boolean (`true`) or a quoted string (`"true"`).
pub(crate) fn deserialize_bool_lenient<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Str(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::Str(s) => match s.to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected 'true' or 'false', got '{other}'"
            ))),
        },
    }
}

/// Complete training specification
///
/// ```yaml
/// runtime:
///   backend: torch
/// training:
///   lr: 0.001
///   batch_size: 4
///   epochs: 20
///   seed: 7
///   mixed_precision: fp16
/// data:
///   num_tasks: 64
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainSpec {
    /// Backend and device
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Training hyperparameters
    #[serde(default)]
    pub training: TrainingParams,

    /// Synthetic task generation
    #[serde(default)]
    pub data: DataParams,
}

/// Training hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingParams {
    /// Adam learning rate
    pub lr: f32,

    /// Tasks per batch; each task is its own batch when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,

    /// Number of epochs
    pub epochs: usize,

    /// Seed for task generation, initialisation and shuffling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Render a progress bar
    #[serde(deserialize_with = "deserialize_bool_lenient")]
    pub progress_bar: bool,

    /// Notebook-style progress output
    #[serde(deserialize_with = "deserialize_bool_lenient")]
    pub notebook: bool,

    /// Loss-scaled reduced precision ("fp16" | "bf16")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mixed_precision: Option<Precision>,

    /// Initial loss scale, overriding the precision's default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss_scale: Option<f32>,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            lr: crate::train::DEFAULT_LR,
            batch_size: None,
            epochs: 1,
            seed: None,
            progress_bar: false,
            notebook: false,
            mixed_precision: None,
            loss_scale: None,
        }
    }
}

/// Synthetic regression tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataParams {
    /// Tasks per epoch
    pub num_tasks: usize,

    /// Context points per task
    pub num_context: usize,

    /// Target points per task
    pub num_target: usize,

    /// Observation noise standard deviation
    pub noise: f32,
}

impl Default for DataParams {
    fn default() -> Self {
        Self {
            num_tasks: 32,
            num_context: 10,
            num_target: 15,
            noise: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let spec: TrainSpec = serde_yaml::from_str("{}").unwrap();
        assert_eq!(spec, TrainSpec::default());
        assert_eq!(spec.training.lr, 5e-5);
        assert_eq!(spec.training.epochs, 1);
        assert_eq!(spec.training.batch_size, None);
    }

    #[test]
    fn test_full_document() {
        let yaml = r#"
runtime:
  backend: tf
  device:
    require_gpu: false
training:
  lr: 0.01
  batch_size: 4
  epochs: 3
  seed: 11
  progress_bar: "true"
  mixed_precision: bf16
  loss_scale: 128
data:
  num_tasks: 8
  num_context: 5
  num_target: 6
  noise: 0.0
"#;
        let spec: TrainSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.runtime.backend, "tf");
        assert_eq!(spec.training.batch_size, Some(4));
        assert_eq!(spec.training.seed, Some(11));
        assert!(spec.training.progress_bar);
        assert!(!spec.training.notebook);
        assert_eq!(spec.training.mixed_precision, Some(Precision::Bf16));
        assert_eq!(spec.training.loss_scale, Some(128.0));
        assert_eq!(spec.data.num_target, 6);
    }

    #[test]
    fn test_lenient_bool_rejects_garbage() {
        let result: Result<TrainSpec, _> = serde_yaml::from_str("training:\n  notebook: maybe");
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let mut spec = TrainSpec::default();
        spec.training.batch_size = Some(2);
        let yaml = serde_yaml::to_string(&spec).unwrap();
        let back: TrainSpec = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, spec);
    }
}
