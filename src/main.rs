//! convnp-trainer CLI
//!
//! # Usage
//!
//! ```bash
//! # Train the reference model
//! convnp-trainer train config.yaml
//!
//! # Train with overrides
//! convnp-trainer train config.yaml --backend tf --epochs 10 --lr 0.001
//!
//! # Validate config
//! convnp-trainer validate config.yaml
//!
//! # Show backend, device and hyperparameters
//! convnp-trainer info config.yaml
//! ```

use clap::Parser;
use convnp_trainer::cli::{init_tracing, run_command, Cli, LogLevel};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(LogLevel::from_flags(cli.verbose, cli.quiet));

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
