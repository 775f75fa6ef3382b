//! Configuration validation logic

use super::error::ValidationError;
use crate::backend::BackendKind;
use crate::config::schema::TrainSpec;

/// Validate a training specification
///
/// Checks:
/// - The backend is supported
/// - Numeric values are in valid ranges
/// - Mixed precision names a reduced precision
///
/// A batch size larger than `num_tasks` is accepted; such an epoch runs no
/// batches.
pub fn validate_spec(spec: &TrainSpec) -> Result<(), ValidationError> {
    let backend = &spec.runtime.backend;
    if backend.parse::<BackendKind>().is_err() {
        return Err(ValidationError::UnknownBackend(backend.clone()));
    }

    let training = &spec.training;
    if !training.lr.is_finite() || training.lr <= 0.0 {
        return Err(ValidationError::InvalidLearningRate(training.lr));
    }

    if let Some(batch_size) = training.batch_size {
        if batch_size == 0 {
            return Err(ValidationError::InvalidBatchSize(batch_size));
        }
    }

    if training.epochs == 0 {
        return Err(ValidationError::InvalidEpochs(training.epochs));
    }

    if let Some(precision) = training.mixed_precision {
        if !precision.is_reduced() {
            return Err(ValidationError::InvalidMixedPrecision(
                precision.to_string(),
            ));
        }
    }

    if let Some(scale) = training.loss_scale {
        if !scale.is_finite() || scale < 1.0 {
            return Err(ValidationError::InvalidLossScale(scale));
        }
    }

    let data = &spec.data;
    if data.num_tasks == 0 {
        return Err(ValidationError::InvalidNumTasks(data.num_tasks));
    }

    // loss is normalised by the target count
    if data.num_target == 0 {
        return Err(ValidationError::InvalidNumTarget(data.num_target));
    }

    if data.noise.is_nan() || data.noise < 0.0 {
        return Err(ValidationError::InvalidNoise(data.noise));
    }

    Ok(())
}
