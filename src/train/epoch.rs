//! One pass over the task list: shuffle, batch, step

use super::options::EpochOptions;
use super::progress::ProgressMode;
use crate::backend::{Backend, TrainingBackend};
use crate::config::RuntimeConfig;
use crate::error::{Error, Result};
use crate::model::{concat_tasks, Model, Task};
use crate::optim::Optimizer;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::slice;

/// Train `model` for one epoch on `tasks` with the configured backend.
///
/// The tasks are shuffled into a new order (the slice itself is not
/// touched). Without a batch size every task is its own step; with one,
/// consecutive groups of `batch_size` shuffled tasks are merged with
/// [`Task::concat`](crate::model::Task::concat) and tasks past the last full
/// group are dropped.
///
/// Returns one loss per processed batch, in processing order.
///
/// # Errors
///
/// - [`Error::NotImplemented`] for an unsupported backend, before any task is used
/// - [`Error::InvalidConfig`] for `batch_size == Some(0)`
/// - any error from merging tasks, computing losses or stacking them; the
///   epoch stops at the failing batch
pub fn train_epoch<M: Model>(
    runtime: &RuntimeConfig,
    model: &M,
    tasks: &[M::Task],
    opts: EpochOptions<'_>,
) -> Result<Vec<f32>> {
    let backend = Backend::from_config(runtime)?;
    run_epoch(&backend, model, tasks, opts)
}

/// [`train_epoch`] with an already selected backend.
pub fn run_epoch<B: TrainingBackend, M: Model>(
    backend: &B,
    model: &M,
    tasks: &[M::Task],
    mut opts: EpochOptions<'_>,
) -> Result<Vec<f32>> {
    let mut default_optimizer;
    let optimizer: &mut dyn Optimizer = match opts.optimizer.take() {
        Some(optimizer) => optimizer,
        None => {
            default_optimizer = backend.build_optimizer(&model.parameters(), opts.lr);
            default_optimizer.as_mut()
        }
    };
    epoch_loop(backend, model, tasks, optimizer, opts)
}

/// Epoch body shared by [`run_epoch`] and the trainer.
pub(crate) fn epoch_loop<B: TrainingBackend, M: Model>(
    backend: &B,
    model: &M,
    tasks: &[M::Task],
    optimizer: &mut dyn Optimizer,
    opts: EpochOptions<'_>,
) -> Result<Vec<f32>> {
    let EpochOptions {
        batch_size,
        mut scaler,
        progress_bar,
        notebook,
        rng,
        ..
    } = opts;

    let num_batches = batch_count(tasks.len(), batch_size)?;
    let order = shuffled_order(tasks.len(), rng);
    let progress = ProgressMode::from_flags(progress_bar, notebook).bar(num_batches as u64);

    let mut losses = Vec::with_capacity(num_batches);
    for i in 0..num_batches {
        let loss = match batch_size {
            Some(size) => {
                let members: Vec<M::Task> = order[i * size..(i + 1) * size]
                    .iter()
                    .map(|&j| tasks[j].clone())
                    .collect();
                let batch = concat_tasks(&members).inspect_err(|err| {
                    let shapes: Vec<String> = members.iter().map(Task::describe_shape).collect();
                    tracing::error!(error = %err, ?shapes, "failed to merge tasks into a batch");
                })?;
                backend.step_batch(
                    model,
                    slice::from_ref(&batch),
                    optimizer,
                    scaler.as_deref_mut(),
                )?
            }
            None => backend.step_batch(
                model,
                slice::from_ref(&tasks[order[i]]),
                optimizer,
                scaler.as_deref_mut(),
            )?,
        };
        losses.push(loss);
        progress.set_message(format!("loss {loss:.4}"));
        progress.inc(1);
    }
    progress.finish_and_clear();

    let mean_loss = if losses.is_empty() {
        f32::NAN
    } else {
        losses.iter().sum::<f32>() / losses.len() as f32
    };
    tracing::info!(
        backend = %backend.kind(),
        tasks = tasks.len(),
        batches = losses.len(),
        mean_loss,
        "epoch complete"
    );
    Ok(losses)
}

/// Number of steps in an epoch over `num_tasks` tasks
///
/// # Errors
///
/// [`Error::InvalidConfig`] when `batch_size` is `Some(0)`.
pub fn batch_count(num_tasks: usize, batch_size: Option<usize>) -> Result<usize> {
    match batch_size {
        Some(0) => Err(Error::invalid_config(
            "batch_size",
            "must be greater than zero",
        )),
        Some(size) => Ok(num_tasks / size),
        None => Ok(num_tasks),
    }
}

/// Uniformly random permutation of `0..n`
pub(crate) fn shuffled_order(n: usize, rng: Option<&mut StdRng>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    match rng {
        Some(rng) => order.shuffle(rng),
        None => order.shuffle(&mut rand::rng()),
    }
    order
}
