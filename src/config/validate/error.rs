//! Validation error types

/// Validation error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Unknown backend: {0} (must be one of: torch, tf)")]
    UnknownBackend(String),

    #[error("Invalid learning rate: {0} (must be > 0.0 and finite)")]
    InvalidLearningRate(f32),

    #[error("Invalid batch size: {0} (must be > 0)")]
    InvalidBatchSize(usize),

    #[error("Invalid epochs: {0} (must be > 0)")]
    InvalidEpochs(usize),

    #[error("Invalid number of tasks: {0} (must be > 0)")]
    InvalidNumTasks(usize),

    #[error("Invalid number of target points: {0} (must be > 0)")]
    InvalidNumTarget(usize),

    #[error("Invalid observation noise: {0} (must be >= 0.0)")]
    InvalidNoise(f32),

    #[error("Invalid mixed precision: {0} (must be fp16 or bf16)")]
    InvalidMixedPrecision(String),

    #[error("Invalid loss scale: {0} (must be >= 1.0 and finite)")]
    InvalidLossScale(f32),
}
