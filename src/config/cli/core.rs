//! Core CLI types - Cli, Command, and argument structs

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::autograd::Precision;
use crate::config::TrainSpec;

/// convnp-trainer: epoch training for neural process models
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "convnp-trainer")]
#[command(version)]
#[command(about = "Backend-agnostic epoch training loop for convolutional neural processes")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Train the reference model from YAML configuration
    Train(TrainArgs),

    /// Validate a configuration file without training
    Validate(ValidateArgs),

    /// Display backend, device and hyperparameters for a configuration
    Info(InfoArgs),
}

/// Arguments for the train command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct TrainArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Override number of epochs
    #[arg(short, long)]
    pub epochs: Option<usize>,

    /// Override batch size
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Override learning rate
    #[arg(short, long)]
    pub lr: Option<f32>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override backend ("torch" or "tf")
    #[arg(long)]
    pub backend: Option<String>,

    /// Fail unless an accelerator is available
    #[arg(long)]
    pub require_gpu: bool,

    /// Enable fp16 loss scaling unless the config already sets a precision
    #[arg(long)]
    pub mixed_precision: bool,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Show detailed validation report
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Output format for the info command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// The resolved configuration as YAML
    Yaml,
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Apply command-line overrides to a TrainSpec
pub fn apply_overrides(spec: &mut TrainSpec, args: &TrainArgs) {
    if let Some(epochs) = args.epochs {
        spec.training.epochs = epochs;
    }
    if let Some(batch_size) = args.batch_size {
        spec.training.batch_size = Some(batch_size);
    }
    if let Some(lr) = args.lr {
        spec.training.lr = lr;
    }
    if let Some(seed) = args.seed {
        spec.training.seed = Some(seed);
    }
    if let Some(backend) = &args.backend {
        spec.runtime.backend = backend.clone();
    }
    if args.require_gpu {
        spec.runtime.device.require_gpu = true;
    }
    if args.mixed_precision && spec.training.mixed_precision.is_none() {
        spec.training.mixed_precision = Some(Precision::Fp16);
    }
    if args.progress {
        spec.training.progress_bar = true;
    }
}
