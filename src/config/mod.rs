//! Declarative configuration
//!
//! - [`RuntimeConfig`]: backend name and device requirements, passed to every
//!   entry point instead of living in process-wide state
//! - [`TrainSpec`]: YAML training specification for the CLI
//! - [`Cli`]: command-line parsing and overrides

mod cli;
mod loader;
mod runtime;
mod schema;
mod validate;

pub use cli::{
    apply_overrides, parse_args, Cli, Command, InfoArgs, OutputFormat, TrainArgs, ValidateArgs,
};
pub use loader::{load_spec, parse_spec};
pub use runtime::{DeviceSettings, RuntimeConfig};
pub use schema::{DataParams, TrainSpec, TrainingParams};
pub use validate::{validate_spec, ValidationError};
