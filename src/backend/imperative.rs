//! Imperative autodiff backend (`"torch"`)

use super::{mean_batch_loss, task_losses, BackendKind, TrainingBackend};
use crate::autograd::{autocast, GradScaler};
use crate::error::Result;
use crate::model::Model;
use crate::optim::{Adam, Optimizer};
use crate::Tensor;

/// Zero grads, back-propagate, step.
///
/// With a [`GradScaler`] the mean loss is recomputed inside an autocast
/// region at the scaler's precision, multiplied by the loss scale before
/// back-propagation, and the optimizer is stepped through the scaler so
/// overflowing steps are skipped. A scaled loss that is not finite skips the
/// step as well and backs the scale off.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImperativeBackend;

impl ImperativeBackend {
    /// Create the backend
    pub fn new() -> Self {
        Self
    }
}

impl TrainingBackend for ImperativeBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Torch
    }

    fn build_optimizer(&self, params: &[Tensor], lr: f32) -> Box<dyn Optimizer> {
        Box::new(Adam::torch_defaults(lr).with_param_slots(params.len()))
    }

    fn step_batch<M: Model>(
        &self,
        model: &M,
        tasks: &[M::Task],
        optimizer: &mut dyn Optimizer,
        scaler: Option<&mut GradScaler>,
    ) -> Result<f32> {
        let mut params = model.parameters();
        optimizer.zero_grad(&mut params);

        let task_losses = task_losses(model, tasks)?;
        let mean_loss = mean_batch_loss(&task_losses)?;

        let loss = match scaler {
            Some(scaler) => {
                let mixed_loss = {
                    let _autocast = autocast(scaler.precision());
                    mean_batch_loss(&task_losses)?
                };
                let scaled_loss = scaler.scale(&mixed_loss);
                // a loss that overflowed the autocast precision counts as an overflow
                let stepped = if scaled_loss.item().is_finite() {
                    scaled_loss.backward();
                    scaler.step(optimizer, &mut params)
                } else {
                    tracing::warn!(
                        scale = scaler.get_scale(),
                        "non-finite scaled loss, skipping optimizer step"
                    );
                    false
                };
                scaler.update(stepped);
                mixed_loss
            }
            None => {
                mean_loss.backward();
                optimizer.step(&mut params);
                mean_loss
            }
        };

        let value = loss.detach().item();
        tracing::debug!(
            backend = "torch",
            tasks = tasks.len(),
            loss = value,
            "train step"
        );
        Ok(value)
    }
}
