//! Epoch training loop
//!
//! - [`train_epoch`]: one shuffled pass over a task list with the backend
//!   named by a [`RuntimeConfig`](crate::config::RuntimeConfig)
//! - [`Trainer`]: model plus persistent optimizer, one `train_epoch` per call
//!
//! # Example
//!
//! ```
//! use convnp_trainer::config::RuntimeConfig;
//! use convnp_trainer::demo::{GaussianNp, TaskGenerator};
//! use convnp_trainer::train::{train_epoch, EpochOptions};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let model = GaussianNp::new(0);
//! let tasks = TaskGenerator::new(1).generate(6, 4, 4);
//! let mut rng = StdRng::seed_from_u64(2);
//!
//! let losses = train_epoch(
//!     &RuntimeConfig::new("tf"),
//!     &model,
//!     &tasks,
//!     EpochOptions::new().with_lr(1e-3).with_batch_size(4).with_rng(&mut rng),
//! )?;
//! assert_eq!(losses.len(), 1);
//! # Ok::<(), convnp_trainer::Error>(())
//! ```

mod epoch;
mod options;
mod progress;
mod trainer;

pub use epoch::{batch_count, run_epoch, train_epoch};
pub use options::{EpochOptions, DEFAULT_LR};
pub use progress::ProgressMode;
pub use trainer::Trainer;
