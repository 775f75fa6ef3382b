//! Gradient scaler for mixed-precision training.

use super::config::DEFAULT_SCALE_GROWTH_INTERVAL;
use super::{MixedPrecisionConfig, Precision};
use crate::autograd::{ops, Tensor};
use crate::optim::Optimizer;

/// Gradient scaler for mixed-precision training
///
/// Multiplies the loss before back-propagation so small gradients survive
/// reduced-precision arithmetic, then divides them back out before the
/// optimizer sees them. Steps whose gradients overflow are skipped and the
/// scale backs off.
///
/// ```
/// use convnp_trainer::autograd::{ops, GradScaler, Tensor};
/// use convnp_trainer::optim::{Adam, Optimizer};
///
/// let w = Tensor::from_vec(vec![1.0], true);
/// let mut params = vec![w.clone()];
/// let mut opt = Adam::torch_defaults(0.1);
/// let mut scaler = GradScaler::new(1024.0);
///
/// let loss = ops::sum(&ops::square(&w));
/// scaler.scale(&loss).backward();
/// let stepped = scaler.step(&mut opt, &mut params);
/// scaler.update(stepped);
/// assert!(stepped);
/// assert!(w.item() < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct GradScaler {
    /// Current loss scale
    scale: f32,
    /// Growth factor
    growth_factor: f32,
    /// Backoff factor
    backoff_factor: f32,
    /// Growth interval
    pub(crate) growth_interval: usize,
    /// Steps since last growth
    steps_since_growth: usize,
    /// Whether dynamic scaling is enabled
    dynamic: bool,
    /// Precision used for autocast regions
    precision: Precision,
    /// Number of overflows encountered
    overflow_count: usize,
    /// Number of successful steps
    successful_steps: usize,
}

impl GradScaler {
    /// Create a new fp16 gradient scaler
    pub fn new(initial_scale: f32) -> Self {
        Self {
            scale: initial_scale,
            growth_factor: 2.0,
            backoff_factor: 0.5,
            growth_interval: DEFAULT_SCALE_GROWTH_INTERVAL,
            steps_since_growth: 0,
            dynamic: true,
            precision: Precision::Fp16,
            overflow_count: 0,
            successful_steps: 0,
        }
    }

    /// Create from config
    pub fn from_config(config: &MixedPrecisionConfig) -> Self {
        Self {
            scale: config.initial_scale,
            growth_factor: config.scale_growth_factor,
            backoff_factor: config.scale_backoff_factor,
            growth_interval: config.scale_growth_interval,
            steps_since_growth: 0,
            dynamic: config.dynamic_scaling,
            precision: config.compute_precision,
            overflow_count: 0,
            successful_steps: 0,
        }
    }

    /// Current loss scale
    pub fn get_scale(&self) -> f32 {
        self.scale
    }

    /// Precision to autocast to while computing the scaled loss
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Multiply a loss tensor by the current scale, keeping it in the graph
    pub fn scale(&self, loss: &Tensor) -> Tensor {
        ops::scale(loss, self.scale)
    }

    /// Unscale gradients in place and check for overflow
    ///
    /// Returns true if gradients are valid (no overflow), false otherwise.
    pub fn unscale_and_check(&self, grads: &mut [f32]) -> bool {
        let inv_scale = 1.0 / self.scale;
        let mut has_overflow = false;

        for grad in grads.iter_mut() {
            *grad *= inv_scale;
            if !grad.is_finite() {
                has_overflow = true;
            }
        }

        !has_overflow
    }

    /// Unscale the parameters' gradients and step the optimizer if they are finite
    ///
    /// Returns whether the optimizer stepped. Pass the result to [`update`].
    ///
    /// [`update`]: GradScaler::update
    pub fn step(&mut self, optimizer: &mut dyn Optimizer, params: &mut [Tensor]) -> bool {
        let mut finite = true;
        for param in params.iter() {
            if let Some(grad) = param.grad() {
                let mut grad = grad.to_vec();
                finite &= self.unscale_and_check(&mut grad);
                param.set_grad(grad.into());
            }
        }

        if finite {
            optimizer.step(params);
        } else {
            tracing::warn!(
                scale = self.scale,
                "non-finite gradients, skipping optimizer step"
            );
        }
        finite
    }

    /// Update the scale after a step
    ///
    /// Call this after each optimizer step. Pass `true` if gradients were valid.
    pub fn update(&mut self, grads_valid: bool) {
        if !self.dynamic {
            return;
        }

        if grads_valid {
            self.successful_steps += 1;
            self.steps_since_growth += 1;

            if self.steps_since_growth >= self.growth_interval {
                self.scale *= self.growth_factor;
                self.steps_since_growth = 0;
            }
        } else {
            self.overflow_count += 1;
            self.scale *= self.backoff_factor;
            self.steps_since_growth = 0;
            self.scale = self.scale.max(1.0);
        }
    }

    /// Get overflow count
    pub fn overflow_count(&self) -> usize {
        self.overflow_count
    }

    /// Get successful step count
    pub fn successful_steps(&self) -> usize {
        self.successful_steps
    }

    /// Check if dynamic scaling is enabled
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }
}

impl Default for GradScaler {
    fn default() -> Self {
        Self::from_config(&MixedPrecisionConfig::fp16())
    }
}
