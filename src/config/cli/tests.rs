//! Tests for CLI argument parsing and overrides

use super::*;
use crate::autograd::Precision;
use crate::config::TrainSpec;
use std::path::PathBuf;

fn train_args(cli: Cli) -> TrainArgs {
    match cli.command {
        Command::Train(args) => args,
        other => panic!("Expected Train command, got {other:?}"),
    }
}

#[test]
fn test_parse_train_command() {
    let cli = parse_args(["convnp-trainer", "train", "config.yaml"]).unwrap();
    let args = train_args(cli);
    assert_eq!(args.config, PathBuf::from("config.yaml"));
    assert_eq!(args.backend, None);
    assert!(!args.require_gpu);
    assert!(!args.mixed_precision);
}

#[test]
fn test_parse_train_with_overrides() {
    let args = train_args(
        parse_args([
            "convnp-trainer",
            "train",
            "config.yaml",
            "--epochs",
            "10",
            "--batch-size",
            "4",
            "--lr",
            "0.001",
            "--seed",
            "42",
            "--backend",
            "tf",
            "--require-gpu",
            "--mixed-precision",
        ])
        .unwrap(),
    );

    assert_eq!(args.epochs, Some(10));
    assert_eq!(args.batch_size, Some(4));
    assert!((args.lr.unwrap() - 0.001).abs() < 1e-6);
    assert_eq!(args.seed, Some(42));
    assert_eq!(args.backend.as_deref(), Some("tf"));
    assert!(args.require_gpu);
    assert!(args.mixed_precision);
}

#[test]
fn test_parse_validate_command() {
    let cli = parse_args(["convnp-trainer", "validate", "config.yaml", "--detailed"]).unwrap();
    match cli.command {
        Command::Validate(args) => {
            assert_eq!(args.config, PathBuf::from("config.yaml"));
            assert!(args.detailed);
        }
        _ => panic!("Expected Validate command"),
    }
}

#[test]
fn test_parse_info_formats() {
    let cli = parse_args(["convnp-trainer", "info", "config.yaml"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Info(InfoArgs {
            format: OutputFormat::Text,
            ..
        })
    ));

    let cli = parse_args([
        "convnp-trainer",
        "info",
        "config.yaml",
        "--format",
        "yaml",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Command::Info(InfoArgs {
            format: OutputFormat::Yaml,
            ..
        })
    ));
}

#[test]
fn test_global_flags() {
    let cli = parse_args(["convnp-trainer", "-v", "validate", "config.yaml"]).unwrap();
    assert!(cli.verbose);
    assert!(!cli.quiet);

    let cli = parse_args(["convnp-trainer", "validate", "config.yaml", "--quiet"]).unwrap();
    assert!(cli.quiet);
}

#[test]
fn test_missing_config_fails() {
    assert!(parse_args(["convnp-trainer", "train"]).is_err());
    let unknown = parse_args(["convnp-trainer", "fit", "config.yaml"]);
    assert!(unknown.is_err());
}

#[test]
fn test_apply_overrides() {
    let args = train_args(
        parse_args([
            "convnp-trainer",
            "train",
            "c.yaml",
            "--epochs",
            "3",
            "--batch-size",
            "2",
            "--backend",
            "tf",
            "--mixed-precision",
        ])
        .unwrap(),
    );
    let mut spec = TrainSpec::default();
    apply_overrides(&mut spec, &args);

    assert_eq!(spec.training.epochs, 3);
    assert_eq!(spec.training.batch_size, Some(2));
    assert_eq!(spec.runtime.backend, "tf");
    assert_eq!(spec.training.mixed_precision, Some(Precision::Fp16));
    // untouched
    assert_eq!(spec.training.lr, 5e-5);
    assert_eq!(spec.training.seed, None);
}

#[test]
fn test_mixed_precision_flag_keeps_configured_precision() {
    let args = train_args(
        parse_args(["convnp-trainer", "train", "c.yaml", "--mixed-precision"]).unwrap(),
    );
    let mut spec = TrainSpec::default();
    spec.training.mixed_precision = Some(Precision::Bf16);
    apply_overrides(&mut spec, &args);
    assert_eq!(spec.training.mixed_precision, Some(Precision::Bf16));
}
