//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_spec, validate_spec, TrainSpec, ValidateArgs};
use crate::error::Result;

/// Format runtime configuration as a string
pub fn format_runtime_info(spec: &TrainSpec) -> String {
    format!(
        "  Backend: {}\n  Require GPU: {}",
        spec.runtime.backend, spec.runtime.device.require_gpu
    )
}

/// Format training configuration as a string
pub fn format_training_info(spec: &TrainSpec) -> String {
    let training = &spec.training;
    let mut lines = vec![
        format!("  Learning rate: {}", training.lr),
        format!("  Epochs: {}", training.epochs),
        match training.batch_size {
            Some(size) => format!("  Batch size: {size}"),
            None => "  Batch size: none (one task per step)".to_string(),
        },
    ];
    if let Some(seed) = training.seed {
        lines.push(format!("  Seed: {seed}"));
    }
    if let Some(precision) = training.mixed_precision {
        lines.push(format!(
            "  Mixed precision: {precision} ({} bytes per value)",
            precision.size_bytes()
        ));
    }
    if let Some(scale) = training.loss_scale {
        lines.push(format!("  Loss scale: {scale}"));
    }
    lines.join("\n")
}

/// Format data configuration as a string
pub fn format_data_info(spec: &TrainSpec) -> String {
    let data = &spec.data;
    format!(
        "  Tasks: {}\n  Context points: {}\n  Target points: {}\n  Noise: {}",
        data.num_tasks, data.num_context, data.num_target, data.noise
    )
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<()> {
    let message = format!("Validating config: {}", args.config.display());
    log(level, LogLevel::Normal, &message);

    let spec = load_spec(&args.config)?;
    validate_spec(&spec)?;

    log(level, LogLevel::Normal, "✓ Configuration is valid");

    if args.detailed {
        log(level, LogLevel::Normal, "");
        log(level, LogLevel::Normal, "Runtime:");
        log(level, LogLevel::Normal, &format_runtime_info(&spec));
        log(level, LogLevel::Normal, "Training:");
        log(level, LogLevel::Normal, &format_training_info(&spec));
        log(level, LogLevel::Normal, "Data:");
        log(level, LogLevel::Normal, &format_data_info(&spec));
    }

    Ok(())
}
