//! Interfaces the training loop consumes: tasks and models
//!
//! The trainer never looks inside a task. It only clones tasks, merges
//! them into batches with [`Task::concat`], and hands them to
//! [`Model::loss_fn`].

use crate::error::Result;
use crate::Tensor;

/// One training example for a neural process model.
pub trait Task: Clone {
    /// Merge several tasks into one batched task.
    ///
    /// Fails when the tasks cannot share a batch (for example, differing
    /// numbers of target points).
    fn concat(tasks: &[Self]) -> Result<Self>;

    /// Short human-readable shape description for diagnostics.
    fn describe_shape(&self) -> String {
        String::from("opaque")
    }
}

/// Merge a sequence of tasks into one batched task.
pub fn concat_tasks<T: Task>(tasks: &[T]) -> Result<T> {
    T::concat(tasks)
}

/// A trainable model exposing a differentiable loss.
pub trait Model {
    /// Task type the loss is computed on.
    type Task: Task;

    /// Loss for one (possibly batched) task.
    ///
    /// With `normalise` set, the loss is divided by the number of target
    /// points so tasks of different sizes contribute comparably. The result
    /// is normally a scalar tensor connected to [`parameters`](Model::parameters).
    fn loss_fn(&self, task: &Self::Task, normalise: bool) -> Result<Tensor>;

    /// Trainable parameters as shared handles, in a stable order.
    fn parameters(&self) -> Vec<Tensor>;

    /// Total number of trainable values.
    fn num_parameters(&self) -> usize {
        self.parameters().iter().map(Tensor::len).sum()
    }
}
