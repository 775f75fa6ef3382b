//! Per-epoch options

use crate::autograd::GradScaler;
use crate::optim::Optimizer;
use rand::rngs::StdRng;

/// Default Adam learning rate
pub const DEFAULT_LR: f32 = 5e-5;

/// Options for one call of [`train_epoch`](super::train_epoch).
///
/// Borrowed state (optimizer, scaler, RNG) stays owned by the caller, so it
/// carries over between epochs.
///
/// ```
/// use convnp_trainer::train::EpochOptions;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let opts = EpochOptions::new().with_lr(1e-3).with_batch_size(8).with_rng(&mut rng);
/// assert_eq!(opts.batch_size, Some(8));
/// ```
pub struct EpochOptions<'a> {
    /// Learning rate for the default optimizer; unused when `optimizer` is set
    pub lr: f32,
    /// Tasks merged per step; `None` steps on each task alone
    pub batch_size: Option<usize>,
    /// Pre-built optimizer; a backend default Adam is built when absent
    pub optimizer: Option<&'a mut dyn Optimizer>,
    /// Loss scaler for mixed precision
    pub scaler: Option<&'a mut GradScaler>,
    /// Render a progress bar
    pub progress_bar: bool,
    /// Notebook-style progress output
    pub notebook: bool,
    /// Shuffle source; thread RNG when absent
    pub rng: Option<&'a mut StdRng>,
}

impl Default for EpochOptions<'_> {
    fn default() -> Self {
        Self {
            lr: DEFAULT_LR,
            batch_size: None,
            optimizer: None,
            scaler: None,
            progress_bar: false,
            notebook: false,
            rng: None,
        }
    }
}

impl<'a> EpochOptions<'a> {
    /// Defaults: lr 5e-5, no batching, no scaler, no progress bar
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the learning rate
    pub fn with_lr(mut self, lr: f32) -> Self {
        self.lr = lr;
        self
    }

    /// Merge `batch_size` tasks per step
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Use an existing optimizer
    pub fn with_optimizer(mut self, optimizer: &'a mut dyn Optimizer) -> Self {
        self.optimizer = Some(optimizer);
        self
    }

    /// Enable loss scaling
    pub fn with_scaler(mut self, scaler: &'a mut GradScaler) -> Self {
        self.scaler = Some(scaler);
        self
    }

    /// Show progress, optionally notebook-style
    pub fn with_progress(mut self, progress_bar: bool, notebook: bool) -> Self {
        self.progress_bar = progress_bar;
        self.notebook = notebook;
        self
    }

    /// Shuffle with a caller-owned RNG
    pub fn with_rng(mut self, rng: &'a mut StdRng) -> Self {
        self.rng = Some(rng);
        self
    }
}
