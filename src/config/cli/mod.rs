//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! convnp-trainer train config.yaml
//! convnp-trainer train config.yaml --backend tf --epochs 10 --batch-size 4
//! convnp-trainer validate config.yaml
//! convnp-trainer info config.yaml --format yaml
//! ```

mod core;

#[cfg(test)]
mod tests;

pub use core::{
    apply_overrides, parse_args, Cli, Command, InfoArgs, OutputFormat, TrainArgs, ValidateArgs,
};
