//! Optimizer trait

use crate::Tensor;
use ndarray::Array1;

/// Trait for optimization algorithms
///
/// Two entry points mirror the two ways gradients are obtained:
/// [`step`](Optimizer::step) reads the gradients accumulated on the
/// parameters by [`Tensor::backward`], while
/// [`apply_gradients`](Optimizer::apply_gradients) takes gradients computed
/// by a [`GradientTape`](crate::autograd::GradientTape).
///
/// Per-parameter state is keyed by position, so callers must pass the
/// parameters in the same order on every call.
pub trait Optimizer {
    /// Update parameters from their stored gradients
    ///
    /// Parameters without a gradient are left untouched.
    fn step(&mut self, params: &mut [Tensor]);

    /// Update parameters from explicitly supplied gradients
    ///
    /// `grads[i]` is applied to `params[i]`.
    fn apply_gradients(&mut self, grads: &[Array1<f32>], params: &mut [Tensor]);

    /// Zero out all gradients
    fn zero_grad(&mut self, params: &mut [Tensor]) {
        for param in params {
            param.zero_grad();
        }
    }

    /// Get learning rate
    fn lr(&self) -> f32;

    /// Set learning rate
    fn set_lr(&mut self, lr: f32);

    /// Number of updates applied so far
    fn step_count(&self) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    /// Plain gradient descent, enough to exercise the default methods
    struct TestOptimizer {
        learning_rate: f32,
        steps: u64,
    }

    impl Optimizer for TestOptimizer {
        fn step(&mut self, params: &mut [Tensor]) {
            let grads: Vec<Option<Array1<f32>>> = params.iter().map(Tensor::grad).collect();
            for (param, grad) in params.iter().zip(grads) {
                if let Some(grad) = grad {
                    *param.data_mut() -= &(grad * self.learning_rate);
                }
            }
            self.steps += 1;
        }

        fn apply_gradients(&mut self, grads: &[Array1<f32>], params: &mut [Tensor]) {
            for (param, grad) in params.iter().zip(grads) {
                *param.data_mut() -= &(grad * self.learning_rate);
            }
            self.steps += 1;
        }

        fn lr(&self) -> f32 {
            self.learning_rate
        }

        fn set_lr(&mut self, lr: f32) {
            self.learning_rate = lr;
        }

        fn step_count(&self) -> u64 {
            self.steps
        }
    }

    #[test]
    fn test_zero_grad_default() {
        let mut opt = TestOptimizer {
            learning_rate: 0.1,
            steps: 0,
        };
        let mut params = vec![Tensor::from_vec(vec![1.0, 2.0], true)];
        params[0].set_grad(arr1(&[0.5, 1.0]));

        opt.zero_grad(&mut params);
        assert_eq!(params[0].grad().unwrap().to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_step_and_apply_agree() {
        let mut a = TestOptimizer {
            learning_rate: 0.1,
            steps: 0,
        };
        let mut b = TestOptimizer {
            learning_rate: 0.1,
            steps: 0,
        };
        let mut pa = vec![Tensor::from_vec(vec![1.0, 2.0], true)];
        let mut pb = vec![Tensor::from_vec(vec![1.0, 2.0], true)];
        pa[0].set_grad(arr1(&[0.5, 1.0]));

        a.step(&mut pa);
        b.apply_gradients(&[arr1(&[0.5, 1.0])], &mut pb);

        assert_eq!(pa[0].to_vec(), pb[0].to_vec());
        assert_eq!(a.step_count(), b.step_count());
    }

    #[test]
    fn test_set_lr() {
        let mut opt = TestOptimizer {
            learning_rate: 0.1,
            steps: 0,
        };
        opt.set_lr(0.01);
        assert_eq!(opt.lr(), 0.01);
    }
}
