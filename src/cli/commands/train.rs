//! Train command implementation

use crate::autograd::{GradScaler, MixedPrecisionConfig};
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{apply_overrides, load_spec, validate_spec, TrainArgs, TrainSpec};
use crate::demo::{GaussianNp, TaskGenerator};
use crate::device::{set_gpu_default_device, DeviceContext, SystemDetector};
use crate::error::Result;
use crate::train::{EpochOptions, Trainer};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub fn run_train(args: TrainArgs, level: LogLevel) -> Result<Vec<f32>> {
    let message = format!("convnp-trainer: training from {}", args.config.display());
    log(level, LogLevel::Normal, &message);

    let mut spec = load_spec(&args.config)?;
    apply_overrides(&mut spec, &args);
    validate_spec(&spec)?;

    let mut devices = DeviceContext::new();
    if spec.runtime.device.require_gpu {
        set_gpu_default_device(&spec.runtime, &SystemDetector, &mut devices)?;
    }
    let device = devices.compute_device();
    log(level, LogLevel::Verbose, &format!("  Device: {device}"));

    train_demo(&spec, level)
}

/// Train the reference model on generated tasks; returns each epoch's mean loss.
pub(crate) fn train_demo(spec: &TrainSpec, level: LogLevel) -> Result<Vec<f32>> {
    let training = &spec.training;
    let seed = training.seed.unwrap_or_else(rand::random);
    log(level, LogLevel::Verbose, &format!("  Seed: {seed}"));

    let data = &spec.data;
    let tasks = TaskGenerator::new(seed)
        .with_noise(data.noise)
        .generate(data.num_tasks, data.num_context, data.num_target);
    let model = GaussianNp::new(seed.wrapping_add(1));
    let mut trainer = Trainer::new(&spec.runtime, model, training.lr)?;
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(2));

    let mut scaler = training
        .mixed_precision
        .map(MixedPrecisionConfig::for_precision)
        .filter(MixedPrecisionConfig::is_mixed)
        .map(|config| match training.loss_scale {
            Some(scale) => config.with_initial_scale(scale),
            None => config,
        })
        .map(|config| GradScaler::from_config(&config));

    let mut epoch_means = Vec::with_capacity(training.epochs);
    for epoch in 1..=training.epochs {
        let mut opts = EpochOptions::new()
            .with_progress(training.progress_bar, training.notebook)
            .with_rng(&mut rng);
        opts.batch_size = training.batch_size;
        if let Some(scaler) = scaler.as_mut() {
            opts = opts.with_scaler(scaler);
        }

        let losses = trainer.train_epoch(&tasks, opts)?;
        let mean = mean_loss(&losses);
        epoch_means.push(mean);
        log(
            level,
            LogLevel::Normal,
            &format!(
                "Epoch {epoch}/{}: loss={mean:.4} ({} batches)",
                training.epochs,
                losses.len()
            ),
        );
    }

    log(level, LogLevel::Normal, "Training complete!");
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "  Mean weights: {:?}\n  Log-scale weights: {:?}",
            trainer.model().mean_weights(),
            trainer.model().log_scale_weights()
        ),
    );
    if let Some(scaler) = &scaler {
        log(
            level,
            LogLevel::Verbose,
            &format!(
                "  Loss scale: {} ({} overflows)",
                scaler.get_scale(),
                scaler.overflow_count()
            ),
        );
    }
    Ok(epoch_means)
}

fn mean_loss(losses: &[f32]) -> f32 {
    if losses.is_empty() {
        f32::NAN
    } else {
        losses.iter().sum::<f32>() / losses.len() as f32
    }
}
