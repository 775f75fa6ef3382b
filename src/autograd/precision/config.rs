//! Configuration for mixed-precision training.

use super::Precision;

/// Default number of clean steps before the loss scale grows
pub(crate) const DEFAULT_SCALE_GROWTH_INTERVAL: usize = 2000;

/// Configuration for mixed-precision training
#[derive(Debug, Clone, PartialEq)]
pub struct MixedPrecisionConfig {
    /// Precision used inside autocast regions
    pub compute_precision: Precision,
    /// Initial loss scale factor
    pub initial_scale: f32,
    /// Factor to increase scale by after a run of clean steps
    pub scale_growth_factor: f32,
    /// Factor to decrease scale by on overflow
    pub scale_backoff_factor: f32,
    /// Number of clean steps before increasing scale
    pub scale_growth_interval: usize,
    /// Whether to use dynamic loss scaling
    pub dynamic_scaling: bool,
}

impl MixedPrecisionConfig {
    /// Full precision, no scaling
    pub fn fp32() -> Self {
        Self {
            compute_precision: Precision::Fp32,
            initial_scale: 1.0,
            scale_growth_factor: 2.0,
            scale_backoff_factor: 0.5,
            scale_growth_interval: DEFAULT_SCALE_GROWTH_INTERVAL,
            dynamic_scaling: false,
        }
    }

    /// fp16 autocast with dynamic scaling from 2^16
    pub fn fp16() -> Self {
        Self {
            compute_precision: Precision::Fp16,
            initial_scale: 65536.0,
            scale_growth_factor: 2.0,
            scale_backoff_factor: 0.5,
            scale_growth_interval: DEFAULT_SCALE_GROWTH_INTERVAL,
            dynamic_scaling: true,
        }
    }

    /// bf16 autocast; the wide exponent makes scaling unnecessary
    pub fn bf16() -> Self {
        Self {
            compute_precision: Precision::Bf16,
            initial_scale: 1.0,
            scale_growth_factor: 2.0,
            scale_backoff_factor: 0.5,
            scale_growth_interval: DEFAULT_SCALE_GROWTH_INTERVAL,
            dynamic_scaling: false,
        }
    }

    /// Config for a given autocast precision
    pub fn for_precision(precision: Precision) -> Self {
        match precision {
            Precision::Fp32 => Self::fp32(),
            Precision::Fp16 => Self::fp16(),
            Precision::Bf16 => Self::bf16(),
        }
    }

    /// Check if mixed precision is enabled
    pub fn is_mixed(&self) -> bool {
        self.compute_precision.is_reduced()
    }

    /// Set initial loss scale
    pub fn with_initial_scale(mut self, scale: f32) -> Self {
        self.initial_scale = scale;
        self
    }
}

impl Default for MixedPrecisionConfig {
    fn default() -> Self {
        Self::fp32()
    }
}
