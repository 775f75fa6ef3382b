//! Error types with actionable diagnostics.
//!
//! Every failure the training loop can surface falls into one of three
//! groups: configuration errors (unsupported backend, bad hyperparameters),
//! resource errors (no accelerator) and data-shape errors (losses or tasks
//! that cannot be combined). None of them are retried.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ValidationError;

/// Result type alias for convnp-trainer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running training.
#[derive(Error, Debug)]
pub enum Error {
    /// The configured backend name is not one of the supported values.
    #[error("Backend {backend} not implemented\n  → Supported backends: torch, tf")]
    NotImplemented { backend: String },

    /// No accelerator device was detected for the requested backend.
    #[error("No GPU available for backend {backend}: {detail}\n  → Check the driver installation or train on CPU")]
    NoAccelerator { backend: String, detail: String },

    /// Tensors could not be stacked into a batch.
    #[error("Failed to stack tensors with shapes {shapes:?}: {message}")]
    Stack {
        shapes: Vec<Vec<usize>>,
        message: String,
    },

    /// Tensor or task shapes are incompatible.
    #[error("Tensor shape mismatch: expected {expected:?}, got {actual:?}\n  → Check that tasks in a batch share context and target sizes")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// A task is malformed.
    #[error("Invalid task: {0}")]
    InvalidTask(String),

    /// A configuration value is invalid.
    #[error("Invalid configuration value for '{field}': {message}")]
    InvalidConfig { field: String, message: String },

    /// A training spec failed validation.
    #[error("Invalid config: {0}")]
    Validation(#[from] ValidationError),

    /// A configuration file has invalid syntax.
    #[error("Invalid configuration syntax in {path}:\n  {message}\n  → Check YAML syntax at the indicated line")]
    ConfigParse { path: PathBuf, message: String },

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid-config error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether this error is a configuration problem the user can fix.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::NotImplemented { .. }
                | Self::InvalidConfig { .. }
                | Self::Validation(_)
                | Self::ConfigParse { .. }
        )
    }
}
