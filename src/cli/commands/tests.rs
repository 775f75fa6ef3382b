//! Tests for CLI command handlers

use super::*;
use crate::config::{parse_args, RuntimeConfig, TrainSpec};
use crate::error::Error;
use crate::test_utils::capture_events;
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::Level;

fn config_file(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{yaml}").unwrap();
    file
}

fn run(args: &[&str]) -> Result<()> {
    let mut argv = vec!["convnp-trainer", "--quiet"];
    argv.extend_from_slice(args);
    run_command(parse_args(argv).unwrap())
}

const SMALL: &str = "training:\n  lr: 0.01\n  epochs: 2\n  seed: 3\ndata:\n  num_tasks: 4\n  num_context: 3\n  num_target: 3\n";

#[test]
fn test_validate_ok() {
    let file = config_file(SMALL);
    let path = file.path().to_str().unwrap();
    assert!(run(&["validate", path]).is_ok());
    assert!(run(&["validate", path, "--detailed"]).is_ok());
}

#[test]
fn test_validate_rejects_bad_values() {
    let file = config_file("training:\n  epochs: 0\n");
    let err = run(&["validate", file.path().to_str().unwrap()]).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn test_validate_missing_file() {
    let err = run(&["validate", "/nonexistent/convnp.yaml"]).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn test_info_formats() {
    let file = config_file(SMALL);
    let path = file.path().to_str().unwrap();
    assert!(run(&["info", path]).is_ok());
    assert!(run(&["info", path, "--format", "yaml"]).is_ok());
}

#[test]
fn test_train_runs_both_backends() {
    let file = config_file(SMALL);
    let path = file.path().to_str().unwrap();
    for backend in ["torch", "tf"] {
        assert!(run(&["train", path, "--backend", backend]).is_ok());
    }
}

#[test]
fn test_train_rejects_unknown_backend_override() {
    let file = config_file(SMALL);
    let path = file.path().to_str().unwrap();
    let err = run(&["train", path, "--backend", "jax"]).unwrap_err();
    assert!(err.is_config_error());
}

#[test]
fn test_train_demo_is_reproducible() {
    let mut spec = TrainSpec::default();
    spec.training.lr = 0.01;
    spec.training.epochs = 2;
    spec.training.seed = Some(9);
    spec.training.batch_size = Some(2);
    spec.data.num_tasks = 6;

    let first = train::train_demo(&spec, LogLevel::Quiet).unwrap();
    let second = train::train_demo(&spec, LogLevel::Quiet).unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[test]
fn test_train_demo_mixed_precision_finite() {
    let mut spec = TrainSpec::default();
    spec.runtime = RuntimeConfig::new("torch");
    spec.training.lr = 0.01;
    spec.training.seed = Some(1);
    spec.training.mixed_precision = Some(crate::autograd::Precision::Fp16);
    spec.data.num_tasks = 4;

    let means = train::train_demo(&spec, LogLevel::Quiet).unwrap();
    assert!(means.iter().all(|m| m.is_finite()));
}

#[test]
fn test_tf_mixed_precision_warns_only_from_backend() {
    let mut spec = TrainSpec::default();
    spec.runtime = RuntimeConfig::new("tf");
    spec.training.epochs = 2;
    spec.training.seed = Some(1);
    spec.training.mixed_precision = Some(crate::autograd::Precision::Fp16);
    spec.data.num_tasks = 4;

    let (means, events) = capture_events(|| train::train_demo(&spec, LogLevel::Quiet));
    assert_eq!(means.unwrap().len(), 2);

    let warnings: Vec<_> = events
        .iter()
        .filter(|event| event.level == Level::WARN)
        .filter(|event| event.message.contains("scaler"))
        .collect();
    assert!(warnings.len() <= 1);
    assert!(warnings
        .iter()
        .all(|event| event.target == "convnp_trainer::backend::tape"));
}

#[test]
fn test_format_training_info() {
    let mut spec = TrainSpec::default();
    let info = validate::format_training_info(&spec);
    assert!(info.contains("one task per step"));
    spec.training.batch_size = Some(4);
    spec.training.seed = Some(1);
    let text = validate::format_training_info(&spec);
    assert!(text.contains("Batch size: 4"));
    assert!(text.contains("Seed: 1"));
}

#[test]
fn test_format_training_info_mixed_precision() {
    let mut spec = TrainSpec::default();
    spec.training.mixed_precision = Some(crate::autograd::Precision::Bf16);
    spec.training.loss_scale = Some(256.0);
    let text = validate::format_training_info(&spec);
    assert!(text.contains("Mixed precision: bf16 (2 bytes per value)"));
    assert!(text.contains("Loss scale: 256"));
}

#[test]
fn test_train_demo_with_custom_loss_scale() {
    let mut spec = TrainSpec::default();
    spec.training.lr = 0.01;
    spec.training.seed = Some(4);
    spec.training.mixed_precision = Some(crate::autograd::Precision::Fp16);
    spec.training.loss_scale = Some(8.0);
    spec.data.num_tasks = 4;

    let means = train::train_demo(&spec, LogLevel::Quiet).unwrap();
    assert_eq!(means.len(), 1);
    assert!(means[0].is_finite());
}
