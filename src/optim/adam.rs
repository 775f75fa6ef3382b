//! Adam optimizer

use super::Optimizer;
use crate::Tensor;
use ndarray::{Array1, Zip};

/// Adam optimizer
///
/// m_t = β1 m_{t-1} + (1 - β1) g
/// v_t = β2 v_{t-1} + (1 - β2) g²
/// θ_t = θ_{t-1} - lr * m̂_t / (√v̂_t + ε)
///
/// Moment buffers are created lazily, one slot per parameter position.
#[derive(Debug, Clone)]
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    t: u64,
    m: Vec<Option<Array1<f32>>>,
    v: Vec<Option<Array1<f32>>>,
}

impl Adam {
    /// Create a new Adam optimizer
    pub fn new(lr: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self {
            lr,
            beta1,
            beta2,
            epsilon,
            t: 0,
            m: Vec::new(),
            v: Vec::new(),
        }
    }

    /// torch.optim.Adam defaults (ε = 1e-8)
    pub fn torch_defaults(lr: f32) -> Self {
        Self::new(lr, 0.9, 0.999, 1e-8)
    }

    /// keras.optimizers.Adam defaults (ε = 1e-7)
    pub fn keras_defaults(lr: f32) -> Self {
        Self::new(lr, 0.9, 0.999, 1e-7)
    }

    /// Reserve a moment slot for each of `num_params` parameters
    pub fn with_param_slots(mut self, num_params: usize) -> Self {
        self.ensure_slots(num_params);
        self
    }

    fn ensure_slots(&mut self, num_params: usize) {
        if self.m.len() < num_params {
            self.m.resize(num_params, None);
            self.v.resize(num_params, None);
        }
    }

    /// Get beta1 hyperparameter
    pub fn beta1(&self) -> f32 {
        self.beta1
    }

    /// Get beta2 hyperparameter
    pub fn beta2(&self) -> f32 {
        self.beta2
    }

    /// Get epsilon hyperparameter
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// First moment buffers, one per parameter slot
    pub fn first_moments(&self) -> &[Option<Array1<f32>>] {
        &self.m
    }

    /// Second moment buffers, one per parameter slot
    pub fn second_moments(&self) -> &[Option<Array1<f32>>] {
        &self.v
    }

    /// Apply one update to parameter slot `i`
    fn update_param(&mut self, i: usize, param: &Tensor, grad: &Array1<f32>) {
        let len = grad.len();
        let m = self.m[i].get_or_insert_with(|| Array1::zeros(len));
        let v = self.v[i].get_or_insert_with(|| Array1::zeros(len));

        let (beta1, beta2) = (self.beta1, self.beta2);
        let bias_correction1 = 1.0 - beta1.powi(self.t as i32);
        let bias_correction2 = 1.0 - beta2.powi(self.t as i32);
        let (lr, eps) = (self.lr, self.epsilon);

        let mut data = param.data_mut();
        Zip::from(&mut *data)
            .and(m)
            .and(v)
            .and(grad)
            .for_each(|p, m, v, &g| {
                *m = beta1 * *m + (1.0 - beta1) * g;
                *v = beta2 * *v + (1.0 - beta2) * g * g;
                let m_hat = *m / bias_correction1;
                let v_hat = *v / bias_correction2;
                *p -= lr * m_hat / (v_hat.sqrt() + eps);
            });
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &mut [Tensor]) {
        self.ensure_slots(params.len());
        self.t += 1;

        for (i, param) in params.iter().enumerate() {
            if let Some(grad) = param.grad() {
                self.update_param(i, param, &grad);
            }
        }
    }

    fn apply_gradients(&mut self, grads: &[Array1<f32>], params: &mut [Tensor]) {
        debug_assert_eq!(grads.len(), params.len(), "one gradient per parameter");
        self.ensure_slots(params.len());
        self.t += 1;

        for (i, (param, grad)) in params.iter().zip(grads).enumerate() {
            self.update_param(i, param, grad);
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }

    fn step_count(&self) -> u64 {
        self.t
    }
}
