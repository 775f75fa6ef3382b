//! # convnp-trainer
//!
//! Backend-agnostic epoch training for neural process models.
//!
//! A [`Model`] exposes a differentiable loss over opaque [`Task`]s. One epoch
//! shuffles the tasks, optionally merges them into batches and runs one
//! optimization step per batch with the backend named in a
//! [`RuntimeConfig`](config::RuntimeConfig):
//!
//! - `"torch"`: imperative autodiff, optional loss-scaled mixed precision
//! - `"tf"`: gradients taken from a [`GradientTape`](autograd::GradientTape)
//!
//! ## Modules
//!
//! - [`autograd`]: reverse-mode tensor, gradient tape, autocast and loss scaling
//! - [`optim`]: optimizer trait and Adam
//! - [`backend`]: the two training-step styles and runtime selection
//! - [`train`]: epoch runner and [`Trainer`]
//! - [`device`]: accelerator detection and default-device selection
//! - [`config`]: runtime settings, YAML training specs, CLI arguments
//! - [`demo`]: a small Gaussian neural process on synthetic regression tasks
//!
//! ## Example
//!
//! ```
//! use convnp_trainer::config::RuntimeConfig;
//! use convnp_trainer::demo::{GaussianNp, TaskGenerator};
//! use convnp_trainer::train::{EpochOptions, Trainer};
//!
//! let tasks = TaskGenerator::new(42).generate(16, 8, 8);
//! let mut trainer = Trainer::new(&RuntimeConfig::new("torch"), GaussianNp::new(0), 1e-2)?;
//! let losses = trainer.train_epoch(&tasks, EpochOptions::new().with_batch_size(4))?;
//! assert_eq!(losses.len(), 4);
//! # Ok::<(), convnp_trainer::Error>(())
//! ```

pub mod autograd;
pub mod backend;
pub mod cli;
pub mod config;
pub mod demo;
pub mod device;
pub mod error;
pub mod model;
pub mod optim;
pub mod train;

#[cfg(test)]
mod test_utils;

pub use autograd::Tensor;
pub use error::{Error, Result};
pub use model::{concat_tasks, Model, Task};
pub use train::{train_epoch, EpochOptions, Trainer};
