//! Trainer: a model bundled with a persistent optimizer

use super::epoch::epoch_loop;
use super::options::EpochOptions;
use crate::backend::{Backend, TrainingBackend};
use crate::config::RuntimeConfig;
use crate::error::Result;
use crate::model::Model;
use crate::optim::Optimizer;

/// Holds a model and the optimizer built for it, so optimizer state
/// (Adam moments, step count) carries over between epochs.
///
/// The backend is selected and the optimizer built once, in [`Trainer::new`].
///
/// ```
/// use convnp_trainer::config::RuntimeConfig;
/// use convnp_trainer::demo::{GaussianNp, TaskGenerator};
/// use convnp_trainer::train::{EpochOptions, Trainer};
///
/// let tasks = TaskGenerator::new(0).generate(8, 5, 5);
/// let mut trainer = Trainer::new(&RuntimeConfig::new("torch"), GaussianNp::new(0), 1e-2)?;
/// for _ in 0..3 {
///     let losses = trainer.train_epoch(&tasks, EpochOptions::new().with_batch_size(2))?;
///     assert_eq!(losses.len(), 4);
/// }
/// assert_eq!(trainer.optimizer().step_count(), 12);
/// # Ok::<(), convnp_trainer::Error>(())
/// ```
pub struct Trainer<M: Model> {
    model: M,
    backend: Backend,
    optimizer: Box<dyn Optimizer>,
}

impl<M: Model> Trainer<M> {
    /// Select the backend and build its default Adam optimizer for `model`.
    ///
    /// # Errors
    ///
    /// [`Error::NotImplemented`](crate::Error::NotImplemented) for an unsupported backend.
    pub fn new(runtime: &RuntimeConfig, model: M, lr: f32) -> Result<Self> {
        let backend = Backend::from_config(runtime)?;
        let optimizer = backend.build_optimizer(&model.parameters(), lr);
        tracing::debug!(
            backend = %backend.kind(),
            lr,
            parameters = model.num_parameters(),
            "trainer initialised"
        );
        Ok(Self {
            model,
            backend,
            optimizer,
        })
    }

    /// Run one epoch with the retained model and optimizer.
    ///
    /// `opts.lr` and `opts.optimizer` are ignored: the trainer always steps
    /// its own optimizer. Use [`set_optimizer`](Self::set_optimizer) to
    /// replace it.
    pub fn train_epoch(&mut self, tasks: &[M::Task], opts: EpochOptions<'_>) -> Result<Vec<f32>> {
        if opts.optimizer.is_some() {
            tracing::warn!("Trainer steps its own optimizer; ignoring the supplied one");
        }
        let optimizer = self.optimizer.as_mut();
        epoch_loop(&self.backend, &self.model, tasks, optimizer, opts)
    }

    /// The model
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the model
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Consume the trainer, returning the model
    pub fn into_model(self) -> M {
        self.model
    }

    /// The persistent optimizer
    pub fn optimizer(&self) -> &dyn Optimizer {
        self.optimizer.as_ref()
    }

    /// Replace the optimizer, discarding the old one's state
    pub fn set_optimizer(&mut self, optimizer: Box<dyn Optimizer>) {
        self.optimizer = optimizer;
    }

    /// The selected backend
    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Current learning rate
    pub fn lr(&self) -> f32 {
        self.optimizer.lr()
    }
}
