//! Tape-based autodiff backend (`"tf"`)

use super::{mean_batch_loss, task_losses, BackendKind, TrainingBackend};
use crate::autograd::{GradScaler, GradientTape};
use crate::error::Result;
use crate::model::Model;
use crate::optim::{Adam, Optimizer};
use crate::Tensor;
use std::sync::Once;

static IGNORED_SCALER: Once = Once::new();

/// Record the forward pass on a tape, then apply the returned gradients.
///
/// Parameter gradients are never stored on the parameters themselves, so
/// there is nothing to zero between steps. Loss scaling is not supported; a
/// supplied [`GradScaler`] is ignored with a one-time warning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TapeBackend;

impl TapeBackend {
    /// Create the backend
    pub fn new() -> Self {
        Self
    }
}

impl TrainingBackend for TapeBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Tf
    }

    fn build_optimizer(&self, _params: &[Tensor], lr: f32) -> Box<dyn Optimizer> {
        Box::new(Adam::keras_defaults(lr))
    }

    fn step_batch<M: Model>(
        &self,
        model: &M,
        tasks: &[M::Task],
        optimizer: &mut dyn Optimizer,
        scaler: Option<&mut GradScaler>,
    ) -> Result<f32> {
        if scaler.is_some() {
            IGNORED_SCALER.call_once(|| {
                tracing::warn!(
                    backend = "tf",
                    "gradient scaler supplied but loss scaling is not supported; ignoring it"
                );
            });
        }

        let mut params = model.parameters();
        let tape = GradientTape::watch(&params);

        let task_losses = task_losses(model, tasks)?;
        let mean_loss = mean_batch_loss(&task_losses)?;

        let grads = tape.gradient(&mean_loss)?;
        optimizer.apply_gradients(&grads, &mut params);

        let value = mean_loss.item();
        tracing::debug!(
            backend = "tf",
            tasks = tasks.len(),
            loss = value,
            "train step"
        );
        Ok(value)
    }
}
