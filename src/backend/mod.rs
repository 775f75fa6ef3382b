//! Training backends
//!
//! A backend owns the framework-specific half of a training step: which
//! optimizer defaults to build and how gradients are obtained and applied.
//!
//! - [`ImperativeBackend`] (`"torch"`): zero the gradients, call
//!   [`Tensor::backward`], step the optimizer. Supports loss scaling.
//! - [`TapeBackend`] (`"tf"`): record under a [`GradientTape`], take the
//!   gradients from the tape, `apply_gradients`.
//!
//! [`Backend`] selects between them from a [`RuntimeConfig`].
//!
//! [`GradientTape`]: crate::autograd::GradientTape
//! [`RuntimeConfig`]: crate::config::RuntimeConfig

mod imperative;
mod kind;
mod tape;

pub use imperative::ImperativeBackend;
pub use kind::BackendKind;
pub use tape::TapeBackend;

use crate::autograd::{ops, GradScaler};
use crate::config::RuntimeConfig;
use crate::error::Result;
use crate::model::Model;
use crate::optim::Optimizer;
use crate::Tensor;

/// One framework's way of running a training step.
pub trait TrainingBackend {
    /// Which backend this is.
    fn kind(&self) -> BackendKind;

    /// Default Adam optimizer for `params` at learning rate `lr`.
    fn build_optimizer(&self, params: &[Tensor], lr: f32) -> Box<dyn Optimizer>;

    /// Run one optimization step on a batch of tasks.
    ///
    /// Computes each task's normalised loss, averages them, back-propagates
    /// and updates the model's parameters. Returns the mean loss.
    fn step_batch<M: Model>(
        &self,
        model: &M,
        tasks: &[M::Task],
        optimizer: &mut dyn Optimizer,
        scaler: Option<&mut GradScaler>,
    ) -> Result<f32>;
}

/// Backend chosen at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Backend {
    /// `"torch"`
    Imperative(ImperativeBackend),
    /// `"tf"`
    Tape(TapeBackend),
}

impl Backend {
    /// Backend for a known kind, with default settings.
    pub fn from_kind(kind: BackendKind) -> Self {
        match kind {
            BackendKind::Torch => Backend::Imperative(ImperativeBackend::new()),
            BackendKind::Tf => Backend::Tape(TapeBackend::new()),
        }
    }

    /// Backend named by the runtime configuration.
    ///
    /// Fails with [`Error::NotImplemented`](crate::Error::NotImplemented) for unknown names.
    pub fn from_config(runtime: &RuntimeConfig) -> Result<Self> {
        Ok(Self::from_kind(runtime.backend_kind()?))
    }
}

impl TrainingBackend for Backend {
    fn kind(&self) -> BackendKind {
        match self {
            Backend::Imperative(b) => b.kind(),
            Backend::Tape(b) => b.kind(),
        }
    }

    fn build_optimizer(&self, params: &[Tensor], lr: f32) -> Box<dyn Optimizer> {
        match self {
            Backend::Imperative(b) => b.build_optimizer(params, lr),
            Backend::Tape(b) => b.build_optimizer(params, lr),
        }
    }

    fn step_batch<M: Model>(
        &self,
        model: &M,
        tasks: &[M::Task],
        optimizer: &mut dyn Optimizer,
        scaler: Option<&mut GradScaler>,
    ) -> Result<f32> {
        match self {
            Backend::Imperative(b) => b.step_batch(model, tasks, optimizer, scaler),
            Backend::Tape(b) => b.step_batch(model, tasks, optimizer, scaler),
        }
    }
}

/// Normalised loss of every task in the batch.
pub(crate) fn task_losses<M: Model>(model: &M, tasks: &[M::Task]) -> Result<Vec<Tensor>> {
    tasks.iter().map(|task| model.loss_fn(task, true)).collect()
}

/// Mean of the stacked task losses.
///
/// A stacking failure is logged with every loss shape and returned unchanged.
pub(crate) fn mean_batch_loss(task_losses: &[Tensor]) -> Result<Tensor> {
    match ops::stack(task_losses) {
        Ok(stacked) => Ok(ops::mean(&stacked)),
        Err(err) => {
            let shapes: Vec<Vec<usize>> = task_losses.iter().map(Tensor::shape).collect();
            tracing::error!(error = %err, ?shapes, "error during stacking of task losses");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_utils::capture_errors;

    #[test]
    fn test_from_config_selects_variant() {
        let torch = Backend::from_config(&RuntimeConfig::new("torch")).unwrap();
        assert!(matches!(torch, Backend::Imperative(_)));
        assert_eq!(torch.kind(), BackendKind::Torch);

        let tf = Backend::from_config(&RuntimeConfig::new("tf")).unwrap();
        assert!(matches!(tf, Backend::Tape(_)));
        assert_eq!(tf.kind(), BackendKind::Tf);
    }

    #[test]
    fn test_from_config_unknown_backend() {
        let err = Backend::from_config(&RuntimeConfig::new("mxnet")).unwrap_err();
        match err {
            Error::NotImplemented { backend } => assert_eq!(backend, "mxnet"),
            other => panic!("expected NotImplemented, got {other:?}"),
        }
    }

    #[test]
    fn test_build_optimizer_uses_backend_defaults() {
        let params = vec![Tensor::zeros(2, true)];
        let torch = Backend::from_kind(BackendKind::Torch).build_optimizer(&params, 1e-3);
        let tf = Backend::from_kind(BackendKind::Tf).build_optimizer(&params, 1e-3);
        assert_eq!(torch.lr(), 1e-3);
        assert_eq!(tf.lr(), 1e-3);
        assert_eq!(torch.step_count(), 0);
    }

    #[test]
    fn test_mean_batch_loss() {
        let losses = vec![Tensor::scalar(1.0, false), Tensor::scalar(2.0, false)];
        assert_eq!(mean_batch_loss(&losses).unwrap().item(), 1.5);
    }

    #[test]
    fn test_mean_batch_loss_reraises_stack_error() {
        let losses = vec![Tensor::scalar(1.0, false), Tensor::zeros(3, false)];
        match mean_batch_loss(&losses) {
            Err(Error::Stack { shapes, .. }) => assert_eq!(shapes, vec![vec![1], vec![3]]),
            other => panic!("expected stack error, got {other:?}"),
        }
    }

    #[test]
    fn test_stack_failure_logs_every_loss_shape() {
        let losses = vec![Tensor::zeros(1, false), Tensor::zeros(2, false)];

        let (result, events) = capture_errors(|| mean_batch_loss(&losses));

        assert!(matches!(result, Err(Error::Stack { .. })));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].shapes, "[[1], [2]]");
        assert_eq!(events[0].message, "error during stacking of task losses");
    }
}
